use std::fmt;

/// Entries of the operator options menu, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    AuditChecklist,
    LogOut,
    AddUser,
    RebootSystem,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::AuditChecklist,
        MenuAction::LogOut,
        MenuAction::AddUser,
        MenuAction::RebootSystem,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::AuditChecklist => "Audit checklist Form",
            MenuAction::LogOut => "Log Out",
            MenuAction::AddUser => "Add User",
            MenuAction::RebootSystem => "Reboot System",
        }
    }

    /// Zero-based position in the menu
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Resolve operator input: a one-based number or the entry label
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if let Ok(number) = input.parse::<usize>() {
            return number.checked_sub(1).and_then(Self::from_index);
        }

        Self::ALL
            .into_iter()
            .find(|action| action.label().eq_ignore_ascii_case(input))
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
