//! Defines the token struct stored in the auth cookie.

use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// A token identifying the account that made a request.
///
/// The token is only ever sent to clients inside a private cookie, which is
/// encrypted and authenticated with the server's cookie key.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Token {
    /// The account the token was issued to.
    pub user_id: AccountId,
}

#[cfg(test)]
mod tests {
    use crate::{account::AccountId, auth::token::Token};

    #[test]
    fn serialise_token() {
        let token = Token {
            user_id: AccountId::new(1),
        };
        let expected = r#"{"user_id":1}"#;

        let actual = serde_json::to_string(&token).unwrap();

        assert_eq!(expected, actual);
    }

    #[test]
    fn deserialise_token() {
        let expected = Token {
            user_id: AccountId::new(1),
        };

        let actual = serde_json::from_str(r#"{"user_id":1}"#).unwrap();

        assert_eq!(expected, actual);
    }
}
