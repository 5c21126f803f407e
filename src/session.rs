//! Connection and authentication state for a provider instance.
//!
//! Kept as an explicit struct with pure transition methods so the state
//! machine is testable without an extension: each transition takes the
//! current state and returns the lifecycle event to publish.

use crate::events::ProviderEvent;
use crate::signer::{ConnectOptions, UserData};

/// Per-provider session state: the connected network options and the
/// authenticated user, if any.
#[derive(Debug, Default)]
pub struct Session {
    options: Option<ConnectOptions>,
    user: Option<UserData>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The connected options; `None` until `connect` has been called.
    pub fn options(&self) -> Option<&ConnectOptions> {
        self.options.as_ref()
    }

    /// The authenticated user, if logged in.
    pub fn user(&self) -> Option<&UserData> {
        self.user.as_ref()
    }

    /// Stores connection options, replacing any previous ones.
    pub fn connect(&mut self, options: ConnectOptions) {
        self.options = Some(options);
    }

    /// Records a successful authentication.
    pub fn login(&mut self, user: UserData) -> ProviderEvent {
        self.user = Some(user.clone());
        ProviderEvent::Login(user)
    }

    /// Clears the authenticated user. Local bookkeeping only: the
    /// extension connection and options are untouched.
    pub fn logout(&mut self) -> ProviderEvent {
        self.user = None;
        ProviderEvent::Logout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserData {
        UserData {
            address: "3N5HNJz5otiUavvoPrxMBrXBVv5HhYLdhiD".to_owned(),
            public_key: "5J8Xa74xPNdtYUAbiTRZiv4DHw1LBsnj5Hu2jfR2EiWR".to_owned(),
        }
    }

    #[test]
    fn starts_disconnected_and_logged_out() {
        let session = Session::new();
        assert!(session.options().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn reconnecting_replaces_the_options() {
        let mut session = Session::new();
        session.connect(ConnectOptions::default());
        assert_eq!(session.options().unwrap().network_byte, b'W');

        session.connect(ConnectOptions {
            network_byte: b'T',
            node_url: "https://nodes-testnet.wavesnodes.com".to_owned(),
        });
        assert_eq!(session.options().unwrap().network_byte, b'T');
    }

    #[test]
    fn login_stores_the_user_and_yields_the_event() {
        let mut session = Session::new();
        let event = session.login(user());
        assert_eq!(event, ProviderEvent::Login(user()));
        assert_eq!(session.user(), Some(&user()));
    }

    #[test]
    fn logout_clears_the_user_but_keeps_the_options() {
        let mut session = Session::new();
        session.connect(ConnectOptions::default());
        session.login(user());

        let event = session.logout();
        assert_eq!(event, ProviderEvent::Logout);
        assert!(session.user().is_none());
        assert!(session.options().is_some());
    }
}
