use crate::{
    device_client::{CommandOutcome, CommandRequest},
    menu::MenuAction,
};

/// Events that can happen in the operator console
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    // Authentication
    Login { email: String, code: String },
    Logout,

    // Menu
    SelectAction(MenuAction),

    // Device commands
    AddUser { email: String, password: String },
    DispatchCompleted(CommandOutcome),
}

/// Work the presentation layer has to carry out after an update
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Model changed, redraw notices and prompts
    Render,
    /// Collect email and password for a new device user
    PromptAddUser,
    /// Send the request and feed the outcome back as `Event::DispatchCompleted`
    Dispatch(CommandRequest),
}
