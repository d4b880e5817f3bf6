//! Referral code generation for approved influencers.

use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::Influencer;
use crate::store::InfluencerStore;
use crate::utils::{AppError, AppResult};

const PREFIX_LEN: usize = 4;
const FALLBACK_PREFIX: &str = "USER";

/// Attempts made before giving up on a unique code.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// First four upper-cased non-whitespace characters of `name`, or `USER`
/// when nothing remains.
pub fn code_prefix(name: Option<&str>) -> String {
    let prefix: String = name
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .take(PREFIX_LEN)
        .collect();

    if prefix.is_empty() {
        FALLBACK_PREFIX.to_string()
    } else {
        prefix
    }
}

/// Prefix plus a random 6-digit suffix.
pub fn generate_code(name: Option<&str>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    format!("{}{}", code_prefix(name), suffix)
}

/// Inserts the influencer row with a fresh code from `generate`, drawing a
/// new one whenever the store reports the code as taken. Gives up with
/// `AppError::Conflict` after [`MAX_CODE_ATTEMPTS`] tries.
pub async fn insert_with_unique_code<S, G>(
    store: &S,
    id: Uuid,
    email: Option<&str>,
    discount_percent: Decimal,
    mut generate: G,
) -> AppResult<Influencer>
where
    S: InfluencerStore + ?Sized,
    G: FnMut() -> String,
{
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = generate();
        match store
            .insert_influencer(id, email, &code, discount_percent)
            .await
        {
            Ok(created) => return Ok(created),
            Err(AppError::Conflict(_)) => {
                tracing::warn!(attempt, code = %code, "Referral code taken, retrying");
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::Conflict(
        "Could not generate a unique referral code".to_string(),
    ))
}
