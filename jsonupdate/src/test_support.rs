//! Test-only record fixtures with deterministic defaults.

use crate::{impl_newtype_value, impl_record};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: String,
}

impl_record!(Address {
    city: leaf [json = "city"],
    zip: leaf [json = "zip", yaml = "postcode"],
});

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
    pub name: String,
    pub address: Address,
}

impl_record!(Profile {
    name: leaf [json = "name", yaml = "name"],
    address: record [json = "address"],
});

impl Profile {
    /// Profile with `name` set and every other field at its default.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeamId(pub u32);

impl_newtype_value!(TeamId(u32));

/// Record covering every field kind the engine distinguishes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Account {
    pub id: u64,
    pub email: String,
    pub age: i32,
    pub score: f64,
    pub tags: Vec<String>,
    pub nickname: Option<String>,
    pub team: TeamId,
    pub profile: Profile,
    pub manager: Option<Box<Profile>>,
}

impl_record!(Account {
    id: readonly [json = "id", db = "user_id"],
    email: leaf [json = "email", yaml = "mail"],
    age: leaf [json = "age"],
    score: leaf [json = "score", toml = "rating"],
    tags: leaf [json = "tags"],
    nickname: leaf [json = "nickname"],
    team: leaf [json = "team"],
    profile: record [json = "profile"],
    manager: optional [json = "manager"],
});

/// Two fields sharing the tag `rank` under different namespaces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ranked {
    pub first: i32,
    pub second: i32,
}

impl_record!(Ranked {
    first: leaf [yaml = "rank"],
    second: leaf [json = "rank"],
});

/// Install a test-friendly tracing subscriber (honors `RUST_LOG`).
pub fn init_tracing() {
    crate::logging::try_init();
}
