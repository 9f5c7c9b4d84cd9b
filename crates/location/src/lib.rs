//! Location resolution for the skill: three chained lookups that turn a
//! device id into a UTC offset.
//!
//! - **Device address** (`address`) - postal code + country from the voice
//!   platform's device settings API (requires location consent)
//! - **Geocode** (`geocode`) - address string to latitude/longitude
//! - **Timezone** (`timezone`) - coordinates + timestamp to a signed minute
//!   offset from UTC (standard + daylight saving)
//! - **Resolver** (`resolver`) - sequential composition of the three
//!
//! Each lookup is a gateway trait with a reqwest-backed HTTP implementation,
//! so the orchestration layer can inject scripted doubles in tests.

pub mod address;
pub mod geocode;
pub mod resolver;
pub mod timezone;

pub use address::{AddressError, DeviceAddress, DeviceAddressGateway, HttpDeviceAddressGateway};
pub use geocode::{GeoPoint, GeocodeError, GeocodeGateway, HttpGeocodeGateway};
pub use resolver::{LocationError, OffsetResolver};
pub use timezone::{HttpTimezoneGateway, TimezoneError, TimezoneGateway};
