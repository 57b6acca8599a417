/// Source of the user's abort request.
///
/// Polled once per file by the orchestrator. Implementations must answer
/// synchronously and must not block beyond a bounded round trip; cancellation
/// is cooperative only and is never observed mid-transformation.
pub trait CancellationSource: Send + Sync {
  fn is_cancelled(&self) -> bool;
}
