/// Options of a compilation.
///
/// Use `CompilerOptions::default()` for standard settings.
///
/// # Examples
///
/// ```
/// use smg_rs::machine::StateMachine;
/// use smg_rs::options::CompilerOptions;
///
/// let options = CompilerOptions {
///     emit_comments: false,
///     ..CompilerOptions::default()
/// };
/// let sm = StateMachine::with_options(options);
/// assert!(!sm.options().emit_comments);
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompilerOptions {
    /// Write comments describing conditions and effect sources (default: true)
    pub emit_comments: bool,
    /// Re-express guard post-conditions on the pre-state of the trigger (default: true)
    pub trigger_join: bool,
    /// Schedule the constituents of a label together with the label (default: true)
    pub nested_label_scheduling: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            emit_comments: true,
            trigger_join: true,
            nested_label_scheduling: true,
        }
    }
}
