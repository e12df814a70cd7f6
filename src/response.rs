//! The response body a hosting service returns for a `solve-equation` request.

use serde::Serialize;

use crate::{config::Limits, solve_with};

pub const OK: u16 = 200;
pub const BAD_REQUEST: u16 = 400;
pub const INTERNAL_SERVER_ERROR: u16 = 500;

pub const MISSING_EQUATION: &str = "Missing or invalid 'equation' parameter.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub equation: String,
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    Solution(Solution),
    Failure(Failure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Body,
}

impl Response {
    /// Answers a request whose `equation` query parameter is `equation`. The
    /// parameter is expected to be URL-decoded already.
    pub fn from_query(equation: Option<&str>, limits: &Limits) -> Self {
        let equation = match equation {
            Some(equation) if !equation.trim().is_empty() => equation,
            _ => return Self::failure(BAD_REQUEST, MISSING_EQUATION),
        };

        match solve_with(equation, limits) {
            Ok(result) => Self {
                status: OK,
                body: Body::Solution(Solution {
                    equation: equation.to_string(),
                    result,
                }),
            },
            Err(e) => Self::failure(e.status_code(), e.to_string()),
        }
    }

    pub fn failure(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            body: Body::Failure(Failure {
                error: error.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OK
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body() {
        let response = Response::from_query(Some("2 + 3 * 4"), &Limits::default());
        assert_eq!(response.status, OK);
        assert_eq!(
            response.to_json().unwrap(),
            r#"{"equation":"2 + 3 * 4","result":14.0}"#
        );
    }

    #[test]
    fn missing_parameter() {
        for equation in [None, Some(""), Some("   ")] {
            let response = Response::from_query(equation, &Limits::default());
            assert_eq!(response.status, BAD_REQUEST);
            assert_eq!(
                response.body,
                Body::Failure(Failure {
                    error: MISSING_EQUATION.to_string()
                })
            );
        }
    }

    #[test]
    fn errors_are_client_errors() {
        for equation in ["5/0", "(1+2", "2 $ 3", "sqrt(-1)", "foo(1)"] {
            let response = Response::from_query(Some(equation), &Limits::default());
            assert_eq!(response.status, BAD_REQUEST, "for '{equation}'");
            assert!(!response.is_success());
        }

        let response = Response::from_query(Some("5/0"), &Limits::default());
        assert_eq!(
            response.to_json().unwrap(),
            r#"{"error":"division by zero"}"#
        );
    }
}
