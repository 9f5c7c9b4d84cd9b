use std::sync::Arc;

use awaybot_core::SkillFailure;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use crate::address::{AddressError, DeviceAddressGateway};
use crate::geocode::{GeocodeError, GeocodeGateway};
use crate::timezone::{TimezoneError, TimezoneGateway};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Timezone(#[from] TimezoneError),
}

impl From<LocationError> for SkillFailure {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::Address(inner) => inner.into(),
            LocationError::Geocode(inner) => inner.into(),
            LocationError::Timezone(inner) => inner.into(),
        }
    }
}

/// Chains the three lookups that turn a device id into a UTC offset:
/// address, then geocode, then timezone. Each step strictly depends on the
/// previous result, so the chain is sequential and stops at the first error.
pub struct OffsetResolver {
    address: Arc<dyn DeviceAddressGateway>,
    geocode: Arc<dyn GeocodeGateway>,
    timezone: Arc<dyn TimezoneGateway>,
}

impl OffsetResolver {
    pub fn new(
        address: Arc<dyn DeviceAddressGateway>,
        geocode: Arc<dyn GeocodeGateway>,
        timezone: Arc<dyn TimezoneGateway>,
    ) -> Self {
        Self { address, geocode, timezone }
    }

    pub async fn resolve_device_offset(
        &self,
        device_id: &str,
        consent_token: &str,
        at: DateTime<Utc>,
    ) -> Result<i32, LocationError> {
        let address = self.address.country_and_postal_code(device_id, consent_token).await?;
        debug!(
            event_name = "location.resolver.address_resolved",
            device_id,
            country_code = %address.country_code,
            "device address resolved"
        );

        let point = self.geocode.geocode(&address.query_string()).await?;
        debug!(
            event_name = "location.resolver.geocoded",
            device_id,
            lat = point.lat,
            lng = point.lng,
            "device address geocoded"
        );

        let offset = self.timezone.utc_offset_minutes(point, at.timestamp()).await?;
        debug!(
            event_name = "location.resolver.offset_resolved",
            device_id, offset, "utc offset resolved"
        );

        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use super::{LocationError, OffsetResolver};
    use crate::address::{AddressError, DeviceAddress, DeviceAddressGateway};
    use crate::geocode::{GeoPoint, GeocodeError, GeocodeGateway};
    use crate::timezone::{TimezoneError, TimezoneGateway};

    struct FixedAddress(Result<DeviceAddress, AddressError>);

    #[async_trait]
    impl DeviceAddressGateway for FixedAddress {
        async fn country_and_postal_code(
            &self,
            _device_id: &str,
            _consent_token: &str,
        ) -> Result<DeviceAddress, AddressError> {
            self.0.clone()
        }
    }

    struct RecordingGeocode {
        result: Result<GeoPoint, GeocodeError>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GeocodeGateway for RecordingGeocode {
        async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
            self.queries.lock().expect("queries lock").push(address.to_owned());
            self.result.clone()
        }
    }

    struct CountingTimezone {
        offset: i32,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TimezoneGateway for CountingTimezone {
        async fn utc_offset_minutes(
            &self,
            _point: GeoPoint,
            _epoch_seconds: i64,
        ) -> Result<i32, TimezoneError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.offset)
        }
    }

    #[tokio::test]
    async fn chain_passes_the_address_query_string_to_the_geocoder() {
        let geocode = Arc::new(RecordingGeocode {
            result: Ok(GeoPoint { lat: 47.6, lng: -122.3 }),
            queries: Mutex::new(Vec::new()),
        });
        let resolver = OffsetResolver::new(
            Arc::new(FixedAddress(Ok(DeviceAddress {
                postal_code: "98109".to_owned(),
                country_code: "US".to_owned(),
            }))),
            geocode.clone(),
            Arc::new(CountingTimezone { offset: -420, calls: AtomicUsize::new(0) }),
        );

        let at = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let offset = resolver
            .resolve_device_offset("device-1", "consent-1", at)
            .await
            .expect("offset should resolve");

        assert_eq!(offset, -420);
        assert_eq!(*geocode.queries.lock().expect("queries lock"), vec!["98109 US".to_owned()]);
    }

    #[tokio::test]
    async fn geocode_failure_stops_the_chain_before_the_timezone_lookup() {
        let timezone = Arc::new(CountingTimezone { offset: 0, calls: AtomicUsize::new(0) });
        let resolver = OffsetResolver::new(
            Arc::new(FixedAddress(Ok(DeviceAddress {
                postal_code: "00000".to_owned(),
                country_code: "XX".to_owned(),
            }))),
            Arc::new(RecordingGeocode {
                result: Err(GeocodeError::Provider { status: "ZERO_RESULTS".to_owned() }),
                queries: Mutex::new(Vec::new()),
            }),
            timezone.clone(),
        );

        let at = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let error = resolver
            .resolve_device_offset("device-1", "consent-1", at)
            .await
            .expect_err("geocode failure should surface");

        assert!(matches!(error, LocationError::Geocode(_)));
        assert_eq!(timezone.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_consent_surfaces_as_an_address_error() {
        let resolver = OffsetResolver::new(
            Arc::new(FixedAddress(Err(AddressError::MissingPermission))),
            Arc::new(RecordingGeocode {
                result: Ok(GeoPoint { lat: 0.0, lng: 0.0 }),
                queries: Mutex::new(Vec::new()),
            }),
            Arc::new(CountingTimezone { offset: 0, calls: AtomicUsize::new(0) }),
        );

        let at = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let error = resolver
            .resolve_device_offset("device-1", "consent-1", at)
            .await
            .expect_err("missing consent should surface");

        assert!(matches!(error, LocationError::Address(AddressError::MissingPermission)));
    }
}
