/// User actions forwarded to the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Join,
    Leave,
    /// Release everything and stop the loop.
    Shutdown,
}
