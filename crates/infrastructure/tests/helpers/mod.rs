#![allow(unused_imports)]

pub mod fake_keystone;

pub use fake_keystone::{FakeKeystone, ADMIN_PASSWORD, ISSUED_TOKEN};
