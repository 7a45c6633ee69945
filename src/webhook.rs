//! Lemon Squeezy billing webhooks: signature check and event routing.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use log::{debug, info, warn};

pub const SIGNATURE_HEADER: &str = "x-signature";

/// Check a hex HMAC-SHA256 of `body` in constant time.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str)
  -> Result<(), crate::error::Error>
{   let expected = hex::decode(signature.trim())
      .map_err(|_| crate::error::Error::InvalidSignature)?;
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
      .map_err(|e| crate::error::Error::InvalidConfiguration(e.to_string()))?;
    mac.update(body);
    mac.verify_slice(&expected)
      .map_err(|_| crate::error::Error::InvalidSignature)
}

/// Hex HMAC-SHA256 of `body`, as Lemon Squeezy sends it
pub fn sign(secret: &str, body: &[u8])
  -> Result<String, crate::error::Error>
{   let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
      .map_err(|e| crate::error::Error::InvalidConfiguration(e.to_string()))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingEventKind
{   SubscriptionCreated
  , SubscriptionUpdated
  , SubscriptionCancelled
  , SubscriptionResumed
  , SubscriptionExpired
  , SubscriptionPaused
  , SubscriptionUnpaused
  , SubscriptionPaymentSuccess
  , SubscriptionPaymentFailed
  , OrderCreated
  , Other(String)
}

impl BillingEventKind
{   pub fn parse(name: &str) -> Self
    {   match name
        {   "subscription_created" => BillingEventKind::SubscriptionCreated
          , "subscription_updated" => BillingEventKind::SubscriptionUpdated
          , "subscription_cancelled" => BillingEventKind::SubscriptionCancelled
          , "subscription_resumed" => BillingEventKind::SubscriptionResumed
          , "subscription_expired" => BillingEventKind::SubscriptionExpired
          , "subscription_paused" => BillingEventKind::SubscriptionPaused
          , "subscription_unpaused" => BillingEventKind::SubscriptionUnpaused
          , "subscription_payment_success" => {
              BillingEventKind::SubscriptionPaymentSuccess
            }
          , "subscription_payment_failed" => {
              BillingEventKind::SubscriptionPaymentFailed
            }
          , "order_created" => BillingEventKind::OrderCreated
          , other => BillingEventKind::Other(other.to_string())
        }
    }
}

/// The parts of a webhook the billing store acts on
#[derive(Debug, Clone, PartialEq)]
pub struct BillingEvent
{   pub kind: BillingEventKind
  , pub user_id: Option<String>
  , pub object_id: Option<String>
  , pub status: Option<String>
  , pub payload: serde_json::Value
}

#[derive(Debug, Deserialize)]
struct Envelope
{   meta: Meta
  , #[serde(default)]
    data: Option<Data>
}

#[derive(Debug, Deserialize)]
struct Meta
{   event_name: String
  , #[serde(default)]
    custom_data: Option<CustomData>
}

#[derive(Debug, Deserialize)]
struct CustomData
{   #[serde(default)]
    user_id: Option<String>
}

#[derive(Debug, Deserialize)]
struct Data
{   #[serde(default)]
    id: Option<serde_json::Value>
  , #[serde(default)]
    attributes: Option<Attributes>
}

#[derive(Debug, Deserialize)]
struct Attributes
{   #[serde(default)]
    status: Option<String>
}

impl BillingEvent
{   pub fn from_body(body: &[u8]) -> Result<Self, crate::error::Error>
    {   let payload: serde_json::Value = serde_json::from_slice(body)
          .map_err(|e| crate::error::Error::ParseError(e.to_string()))?;
        let envelope: Envelope = serde_json::from_value(payload.clone())
          .map_err(|e| crate::error::Error::ParseError(e.to_string()))?;

        let (object_id, status) = match envelope.data
        {   Some(data) => (
              data.id.map(|id| match id
              {   serde_json::Value::String(s) => s
                , other => other.to_string()
              })
            , data.attributes.and_then(|a| a.status)
            )
          , None => (None, None)
        };

        Ok(BillingEvent
        {   kind: BillingEventKind::parse(&envelope.meta.event_name)
          , user_id: envelope.meta.custom_data.and_then(|c| c.user_id)
          , object_id
          , status
          , payload
        })
    }
}

/// Where verified billing events go
#[async_trait]
pub trait BillingSink: Send + Sync
{   async fn record(&self, event: BillingEvent)
      -> Result<(), crate::error::Error>;
}

/// Sink that only logs; used when no subscription store is wired in
#[derive(Debug, Clone, Default)]
pub struct LogSink;

#[async_trait]
impl BillingSink for LogSink
{   async fn record(&self, event: BillingEvent)
      -> Result<(), crate::error::Error>
    {   match &event.kind
        {   BillingEventKind::Other(name) => {
              warn!("Unhandled billing event: {}", name);
            }
          , kind => {
              info!(
                "Billing event {:?} for user {:?} (object {:?}, status {:?})",
                kind, event.user_id, event.object_id, event.status
              );
            }
        }
        Ok(())
    }
}

/// How the webhook route treats signatures
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig
{   pub signing_secret: Option<String>
  , /// Verify signatures; off outside production
    pub enforce_signature: bool
}

impl WebhookConfig
{   pub fn from_server_config(config: &crate::config::ServerConfig) -> Self
    {   WebhookConfig
        {   signing_secret: config.lemon_squeezy_signing_secret.clone()
          , enforce_signature: config.environment.is_production()
        }
    }

    /// Signature gate for one delivery
    pub fn check(&self, body: &[u8], signature: Option<&str>)
      -> Result<(), crate::error::Error>
    {   if !self.enforce_signature
        {   warn!("Webhook signature check bypassed outside production");
            return Ok(());
        }
        let secret = self.signing_secret.as_deref().ok_or_else(|| {
          crate::error::Error::InvalidConfiguration(
            "LEMON_SQUEEZY_SIGNING_SECRET is not set".to_string()
          )
        })?;
        let signature = signature
          .ok_or(crate::error::Error::InvalidSignature)?;
        verify_signature(secret, body, signature)?;
        debug!("Webhook signature verified");
        Ok(())
    }
}
