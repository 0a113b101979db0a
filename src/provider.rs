//! Provider-facing descriptors (data) and identity resolvers (behavior).
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the three
//! RFC 5849 endpoints plus an optional identify endpoint, the signature method, parameter
//! placement, and provider quirks. `identity` defines [`IdentityResolver`], the hook that
//! turns an authenticated identify response into a caller-defined identity value.

pub mod descriptor;
pub mod identity;

pub use descriptor::*;
pub use identity::*;
