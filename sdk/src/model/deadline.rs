//! Transaction deadlines.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use super::network::NetworkType;
use super::ModelError;
use crate::codec::{
    CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec, StdInt, Uint64Dto,
};
use crate::config::{DEFAULT_DEADLINE_HOURS, NETWORK_EPOCH_SECONDS};

/// The last moment a transaction may be included in a block, as
/// milliseconds since the network epoch (2016-04-01T00:00:00Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Deadline(u64);

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(NETWORK_EPOCH_SECONDS, 0).unwrap_or_default()
}

impl Deadline {
    /// `now + duration`.
    pub fn create(duration: Duration) -> Result<Self, ModelError> {
        Self::at(Utc::now(), duration)
    }

    /// Two hours from now.
    pub fn default_from_now() -> Result<Self, ModelError> {
        Self::create(Duration::hours(DEFAULT_DEADLINE_HOURS))
    }

    /// `start + duration`, for callers that control the clock.
    pub fn at(start: DateTime<Utc>, duration: Duration) -> Result<Self, ModelError> {
        let when = start
            .checked_add_signed(duration)
            .ok_or_else(|| ModelError::InvalidDeadline(format!("{start} + {duration} overflows")))?;
        Self::from_datetime(when)
    }

    pub fn from_datetime(when: DateTime<Utc>) -> Result<Self, ModelError> {
        let millis = (when - epoch()).num_milliseconds();
        u64::try_from(millis)
            .map(Self)
            .map_err(|_| ModelError::InvalidDeadline(format!("{when} is before the network epoch")))
    }

    /// Wrap a raw network timestamp.
    pub fn from_timestamp(millis: u64) -> Self {
        Self(millis)
    }

    pub fn timestamp(self) -> u64 {
        self.0
    }

    /// `None` when the timestamp lies beyond what `chrono` can represent.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.0).ok()?;
        epoch().checked_add_signed(Duration::try_milliseconds(millis)?)
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(when) => write!(f, "{}", when.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl From<u64> for Deadline {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}

impl CatbufferCodec for Deadline {
    fn catbuffer_size(&self) -> usize {
        u64::BYTES
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write(self.0);
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        reader.read::<u64>().map(Self)
    }
}

impl DtoCodec for Deadline {
    type Dto = Uint64Dto;

    fn to_dto(&self) -> Self::Dto {
        self.0.to_dto()
    }

    fn from_dto(dto: Self::Dto, _network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self(u64::from_dto(dto)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_april_first_2016() {
        assert_eq!(
            Deadline::from_timestamp(0).to_string(),
            "2016-04-01T00:00:00+00:00"
        );
    }

    #[test]
    fn at_adds_duration_to_start() {
        let start = epoch() + Duration::days(1);
        let deadline = Deadline::at(start, Duration::hours(2)).unwrap();
        assert_eq!(deadline.timestamp(), (26 * 3600) * 1000);
        assert_eq!(deadline.to_datetime(), Some(start + Duration::hours(2)));
    }

    #[test]
    fn before_epoch_is_rejected() {
        let early = epoch() - Duration::seconds(1);
        assert!(Deadline::from_datetime(early).is_err());
    }

    #[test]
    fn create_is_in_the_future() {
        let deadline = Deadline::default_from_now().unwrap();
        assert!(deadline.to_datetime().unwrap() > Utc::now());
    }

    #[test]
    fn unrepresentable_timestamp_displays_raw_millis() {
        let far = Deadline::from_timestamp(u64::MAX);
        assert_eq!(far.to_datetime(), None);
        assert_eq!(far.to_string(), format!("{}ms", u64::MAX));
        assert_eq!(Deadline::from_timestamp(1 << 63).to_datetime(), None);
    }
}
