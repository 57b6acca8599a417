use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Writes `contents` through a sibling temp file and a rename, so a crash
/// mid-write never leaves a truncated file behind.
///
/// The temp name appends to the full file name rather than replacing the
/// extension; writers targeting `foo.toml` and `foo` get distinct temp files.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = tmp_path_for(path)?;

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

fn tmp_path_for(path: &Path) -> io::Result<std::path::PathBuf> {
  let Some(name) = path.file_name() else {
    return Err(io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"));
  };

  let mut tmp_name = name.to_os_string();
  tmp_name.push(".chirp.tmp");
  Ok(path.with_file_name(tmp_name))
}
