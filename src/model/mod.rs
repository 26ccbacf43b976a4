//! Validated zone data.
//!
//! A [`Zone`] and its [`Record`]s can only be constructed from data that passes validation, so
//! anything holding one can rely on its shape.
//!
//! # Records
//!
//! Every record is an `(id, type, name, value)` tuple:
//!
//! - `id` is the provider's identifier: empty for a record that hasn't been created yet,
//!   otherwise 32 lowercase hexadecimal characters.
//! - `type` is one of `A`, `AAAA`, `CAA`, `CNAME`, `MX`, `NS`, `PTR`, `SOA`, `SRV` or `TXT`.
//! - `name` is `@` for the zone apex, or one or more dot separated labels relative to the zone.
//!   Labels are 1 to 63 letters, digits, hyphens or underscores and don't start or end with a
//!   hyphen. Underscores allow names such as `_dmarc` or `_sip._tcp`.
//! - `value` must satisfy the grammar of the type:
//!
//! | type    | value                                                            |
//! |---------|------------------------------------------------------------------|
//! | `A`     | IPv4 address                                                     |
//! | `AAAA`  | IPv6 address                                                     |
//! | `CNAME` | hostname, absolute with a trailing dot or relative to the zone   |
//! | `MX`    | `<priority 0-65535> <hostname>`                                  |
//! | `TXT`   | one or more double quoted strings separated by whitespace        |
//! | `SOA`   | `<mname> <rname> <serial> <refresh> <retry> <expire> <minimum>`  |
//!
//! `NS`, `SRV`, `CAA` and `PTR` values are only required to be non-empty.
//!
//! # Zones
//!
//! A zone has a 22 character alphanumeric provider id and a name without a trailing dot, e.g.
//! `example.com`. The final label must be at least two characters and not numeric. No two
//! records may share type, name and value.
//!
//! ```json
//! {
//!   "id": "a1b2c3d4e5f6g7h8i9j0k1",
//!   "name": "example.com",
//!   "records": [
//!     { "type": "A", "name": "www", "value": "192.0.2.1" },
//!     { "type": "MX", "name": "@", "value": "10 mail.example.com." },
//!     { "id": "0123456789abcdef0123456789abcdef", "type": "TXT", "name": "@",
//!       "value": "\"v=spf1 mx -all\"" }
//!   ]
//! }
//! ```

pub(crate) mod grammar;
pub mod record;
pub mod zone;

pub use record::{Record, RecordType, APEX};
pub use zone::Zone;
