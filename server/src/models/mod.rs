pub mod booking;
pub mod contact;
pub mod event;
pub mod influencer;
pub mod profile;
pub mod verification;

pub use booking::{Booking, BookingStatus, BookingSummary, NewBooking};
pub use contact::ContactMessage;
pub use event::{Event, EventDraft, FeaturedEvent, TicketType, TicketTypeDraft};
pub use influencer::{Influencer, InfluencerSummary, ReferralStats};
pub use profile::{Profile, ProfileUpsert, Role};
pub use verification::EmailVerification;
