/// What the user is asked to approve before a large import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPrompt {
    pub rows: usize,
    pub discarded: usize,
    pub sources: Vec<String>,
}

impl ImportPrompt {
    pub fn message(&self) -> String {
        format!(
            "Import {} records from {}?",
            self.rows,
            self.sources.join(", ")
        )
    }
}

/// Asks the user to approve an import.
pub trait ConfirmImport {
    fn confirm(&self, prompt: &ImportPrompt) -> bool;
}

impl<F> ConfirmImport for F
where
    F: Fn(&ImportPrompt) -> bool,
{
    fn confirm(&self, prompt: &ImportPrompt) -> bool {
        self(prompt)
    }
}

/// Approves every import.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmImport for AlwaysConfirm {
    fn confirm(&self, _prompt: &ImportPrompt) -> bool {
        true
    }
}
