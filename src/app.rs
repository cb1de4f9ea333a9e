use crate::{
    config::DeviceConfig,
    credential_gate::CredentialGate,
    device_client::{CommandOutcome, CommandRequest},
    error::OperatorError,
    events::{Effect, Event},
    menu::MenuAction,
    model::Model,
};
use log::{debug, info, warn};

/// Operator console core
///
/// Owns the static collaborators (credential gate, target device) and turns
/// events into model changes plus one effect for the shell to run.
#[derive(Clone, Debug)]
pub struct App {
    gate: CredentialGate,
    device: DeviceConfig,
}

impl App {
    pub fn new(gate: CredentialGate, device: DeviceConfig) -> Self {
        Self { gate, device }
    }

    pub fn update(&self, event: Event, model: &mut Model) -> Effect {
        match event {
            Event::Login { email, code } => self.login(&email, &code, model),

            Event::Logout => Self::logout(model),

            Event::SelectAction(action) => {
                if !model.is_authenticated && action != MenuAction::LogOut {
                    model.set_error(OperatorError::NotAuthenticated(action.label().to_string()));
                    return Effect::Render;
                }

                match action {
                    MenuAction::AddUser => Effect::PromptAddUser,
                    MenuAction::AuditChecklist => {
                        model.set_error(OperatorError::NotImplemented("Audit checklist form"));
                        Effect::Render
                    }
                    MenuAction::RebootSystem => {
                        model.set_error(OperatorError::NotImplemented("Reboot command"));
                        Effect::Render
                    }
                    MenuAction::LogOut => Self::logout(model),
                }
            }

            Event::AddUser { email, password } => {
                if !model.is_authenticated {
                    model.set_error(OperatorError::NotAuthenticated("Add user".to_string()));
                    return Effect::Render;
                }

                let request =
                    CommandRequest::add_user(&self.device.base_url, email.trim(), password.trim());
                model.pending_dispatches += 1;
                Effect::Dispatch(request)
            }

            Event::DispatchCompleted(outcome) => {
                model.pending_dispatches = model.pending_dispatches.saturating_sub(1);

                match outcome {
                    CommandOutcome::Success => model.set_success("User sent to ESP!"),
                    outcome => {
                        if let Err(e) = outcome.into_result() {
                            model.set_error(e);
                        }
                    }
                }
                Effect::Render
            }
        }
    }

    fn logout(model: &mut Model) -> Effect {
        debug!("logout");
        model.invalidate_session();
        model.clear_notice();
        Effect::Render
    }

    fn login(&self, email: &str, code: &str, model: &mut Model) -> Effect {
        match self.gate.login(email, code) {
            Ok(identity) => {
                info!("operator logged in");
                model.start_session(identity.clone());
                model.set_success("Login successful!");
            }
            Err(e) => {
                warn!("login rejected: {e}");
                model.invalidate_session();
                model.set_error(e);
            }
        }

        Effect::Render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoticeLevel;

    fn app() -> App {
        App::new(CredentialGate::default(), DeviceConfig::default())
    }

    fn logged_in(app: &App) -> Model {
        let mut model = Model::default();
        app.update(
            Event::Login {
                email: "admin2@nuerovent.com".to_string(),
                code: "2222".to_string(),
            },
            &mut model,
        );
        model.clear_notice();
        model
    }

    mod login {
        use super::*;

        #[test]
        fn success_sets_generic_notice() {
            let app = app();
            let mut model = Model::default();

            let effect = app.update(
                Event::Login {
                    email: " ADMIN4@nuerovent.com ".to_string(),
                    code: "4444".to_string(),
                },
                &mut model,
            );

            assert_eq!(effect, Effect::Render);
            assert!(model.is_authenticated);
            let notice = model.take_notice().unwrap();
            assert_eq!(notice.text, "Login successful!");
            assert!(!notice.text.contains("admin4"));
        }

        #[test]
        fn mismatch_keeps_session_closed() {
            let app = app();
            let mut model = Model::default();

            app.update(
                Event::Login {
                    email: "admin4@nuerovent.com".to_string(),
                    code: "1111".to_string(),
                },
                &mut model,
            );

            assert!(!model.is_authenticated);
            assert_eq!(model.take_notice().unwrap().text, "Invalid email or code");
        }

        #[test]
        fn blank_input_asks_for_both_fields() {
            let app = app();
            let mut model = Model::default();

            app.update(
                Event::Login {
                    email: String::new(),
                    code: String::new(),
                },
                &mut model,
            );

            assert_eq!(
                model.take_notice().unwrap().text,
                "Please enter both email and code"
            );
        }
    }

    mod menu {
        use super::*;

        #[test]
        fn add_user_prompts_for_fields() {
            let app = app();
            let mut model = logged_in(&app);

            let effect = app.update(Event::SelectAction(MenuAction::AddUser), &mut model);

            assert_eq!(effect, Effect::PromptAddUser);
        }

        #[test]
        fn reboot_is_not_implemented() {
            let app = app();
            let mut model = logged_in(&app);

            app.update(Event::SelectAction(MenuAction::RebootSystem), &mut model);

            let notice = model.take_notice().unwrap();
            assert_eq!(notice.level, NoticeLevel::Error);
            assert_eq!(notice.text, "Reboot command not implemented yet");
        }

        #[test]
        fn audit_checklist_is_not_implemented() {
            let app = app();
            let mut model = logged_in(&app);

            app.update(Event::SelectAction(MenuAction::AuditChecklist), &mut model);

            assert_eq!(
                model.take_notice().unwrap().text,
                "Audit checklist form not implemented yet"
            );
        }

        #[test]
        fn log_out_invalidates_session() {
            let app = app();
            let mut model = logged_in(&app);

            app.update(Event::SelectAction(MenuAction::LogOut), &mut model);

            assert!(!model.is_authenticated);
        }

        #[test]
        fn logout_event_ends_session_and_clears_notice() {
            let app = app();
            let mut model = logged_in(&app);
            model.set_success("User sent to ESP!");

            let effect = app.update(Event::Logout, &mut model);

            assert_eq!(effect, Effect::Render);
            assert!(!model.is_authenticated);
            assert!(model.operator().is_none());
            assert!(model.take_notice().is_none());
        }

        #[test]
        fn actions_require_login() {
            let app = app();
            let mut model = Model::default();

            let effect = app.update(Event::SelectAction(MenuAction::AddUser), &mut model);

            assert_eq!(effect, Effect::Render);
            assert_eq!(
                model.take_notice().unwrap().text,
                "Add User failed: Not authenticated"
            );
        }
    }

    mod add_user {
        use super::*;

        #[test]
        fn dispatches_trimmed_fields_to_configured_device() {
            let app = App::new(
                CredentialGate::default(),
                DeviceConfig::from_base_url("http://10.1.2.3").unwrap(),
            );
            let mut model = logged_in(&app);

            let effect = app.update(
                Event::AddUser {
                    email: " a@b.com ".to_string(),
                    password: "pw\n".to_string(),
                },
                &mut model,
            );

            assert_eq!(
                effect,
                Effect::Dispatch(CommandRequest::add_user("http://10.1.2.3", "a@b.com", "pw"))
            );
            assert_eq!(model.pending_dispatches, 1);
        }

        #[test]
        fn requires_login() {
            let app = app();
            let mut model = Model::default();

            let effect = app.update(
                Event::AddUser {
                    email: "a@b.com".to_string(),
                    password: "pw".to_string(),
                },
                &mut model,
            );

            assert_eq!(effect, Effect::Render);
            assert_eq!(model.pending_dispatches, 0);
        }

        #[test]
        fn same_user_twice_dispatches_twice() {
            let app = app();
            let mut model = logged_in(&app);
            let event = Event::AddUser {
                email: "a@b.com".to_string(),
                password: "pw".to_string(),
            };

            let first = app.update(event.clone(), &mut model);
            let second = app.update(event, &mut model);

            assert_eq!(first, second);
            assert!(matches!(first, Effect::Dispatch(_)));
            assert_eq!(model.pending_dispatches, 2);
        }
    }

    mod dispatch_completed {
        use super::*;

        fn complete(outcome: CommandOutcome) -> Model {
            let app = app();
            let mut model = logged_in(&app);
            model.pending_dispatches = 1;

            app.update(Event::DispatchCompleted(outcome), &mut model);
            model
        }

        #[test]
        fn success_reports_user_sent() {
            let mut model = complete(CommandOutcome::Success);

            assert_eq!(model.pending_dispatches, 0);
            let notice = model.take_notice().unwrap();
            assert_eq!(notice.level, NoticeLevel::Success);
            assert_eq!(notice.text, "User sent to ESP!");
        }

        #[test]
        fn rejected_reports_status() {
            let mut model = complete(CommandOutcome::Rejected("400".to_string()));
            assert_eq!(
                model.take_notice().unwrap().text,
                "ESP rejected user: HTTP 400"
            );
        }

        #[test]
        fn unreachable_reports_connection_failure() {
            let mut model = complete(CommandOutcome::Unreachable("connection refused".to_string()));
            assert_eq!(
                model.take_notice().unwrap().text,
                "Failed to connect to ESP: connection refused"
            );
        }

        #[test]
        fn outcome_after_logout_is_still_reported() {
            let app = app();
            let mut model = Model::default();
            model.pending_dispatches = 1;

            app.update(Event::DispatchCompleted(CommandOutcome::Success), &mut model);

            assert_eq!(model.pending_dispatches, 0);
            assert!(model.notice.is_some());
        }
    }
}
