//! Static description of the backend service.

/// Candid text of the service.
pub const ANIMA_DID: &str = include_str!("../anima.did");

/// Whether a method mutates canister state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    Query,
    Update,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Update => "update",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: &'static str,
    pub kind: CallKind,
}

pub const METHODS: &[MethodSpec] = &[
    MethodSpec {
        name: "mint_anima",
        kind: CallKind::Update,
    },
    MethodSpec {
        name: "get_anima",
        kind: CallKind::Query,
    },
    MethodSpec {
        name: "get_user_animas",
        kind: CallKind::Query,
    },
    MethodSpec {
        name: "interact",
        kind: CallKind::Update,
    },
    MethodSpec {
        name: "verify_payment",
        kind: CallKind::Query,
    },
];

pub fn method(name: &str) -> Option<&'static MethodSpec> {
    METHODS.iter().find(|m| m.name == name)
}
