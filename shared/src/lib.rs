use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

mod envelope;
mod payment;

pub use envelope::{
    decode_item, decode_list, decode_list_value, decode_mutation, error_message, EnvelopeError, MutationOutcome, Page,
    PageMeta,
};
pub use payment::{HashFormat, PaymentError, Transition, TxHash};

/// A list resource served by the marketplace API.
///
/// Every kind shares the same display shape (identity, title, optional image,
/// optional status, creation time, owner) so list pages can render and
/// moderate them generically.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// List endpoint, relative to the API base.
    const PATH: &'static str;
    /// Key under `data` holding the items when the backend nests them.
    const COLLECTION_KEY: &'static str;

    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn created_at(&self) -> &str;

    fn image(&self) -> Option<&str> {
        None
    }

    fn moderation(&self) -> Option<ModerationStatus> {
        None
    }

    fn owner(&self) -> Option<&Owner> {
        None
    }
}

// ── Identity ──

/// Document identity. Mongo backends send `_id`; with virtuals enabled they
/// mirror it as `id` too, and either key alone is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IdKeys", into = "IdOut")]
pub struct RecordId(String);

#[derive(Deserialize)]
struct IdKeys {
    #[serde(rename = "_id")]
    mongo: Option<String>,
    id: Option<String>,
}

#[derive(Serialize)]
struct IdOut {
    id: String,
}

impl TryFrom<IdKeys> for RecordId {
    type Error = &'static str;

    fn try_from(keys: IdKeys) -> Result<Self, Self::Error> {
        keys.mongo.or(keys.id).map(Self).ok_or("missing field `id` or `_id`")
    }
}

impl From<RecordId> for IdOut {
    fn from(id: RecordId) -> Self {
        Self { id: id.0 }
    }
}

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Status enums ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    #[serde(alias = "active", alias = "published")]
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl ModerationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[serde(alias = "pending")]
    AwaitingPayment,
    #[serde(alias = "submitted")]
    ProofSubmitted,
    #[serde(alias = "approved", alias = "completed")]
    Verified,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingPayment => "awaiting_payment",
            Self::ProofSubmitted => "proof_submitted",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AwaitingPayment => "Awaiting payment",
            Self::ProofSubmitted => "Proof submitted",
            Self::Verified => "Verified",
            Self::Rejected => "Rejected",
            Self::Unknown => "Unknown",
        }
    }
}

// ── Actors ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(default, alias = "username", alias = "fullName")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(flatten)]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: String,
}

// ── Listings ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(flatten)]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    pub city: String,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ModerationStatus,
    #[serde(default)]
    pub owner: Option<Owner>,
    pub created_at: String,
}

impl Resource for Listing {
    const PATH: &'static str = "/api/listings";
    const COLLECTION_KEY: &'static str = "listings";

    fn id(&self) -> &str {
        self.id.as_str()
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
    fn moderation(&self) -> Option<ModerationStatus> {
        Some(self.status)
    }
    fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }
}

/// Same wire shape as [`Listing`], served from the moderation queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminListing(pub Listing);

impl Resource for AdminListing {
    const PATH: &'static str = "/api/admin/listings";
    const COLLECTION_KEY: &'static str = "listings";

    fn id(&self) -> &str {
        self.0.id.as_str()
    }
    fn title(&self) -> &str {
        &self.0.title
    }
    fn created_at(&self) -> &str {
        &self.0.created_at
    }
    fn image(&self) -> Option<&str> {
        self.0.image()
    }
    fn moderation(&self) -> Option<ModerationStatus> {
        Some(self.0.status)
    }
    fn owner(&self) -> Option<&Owner> {
        self.0.owner.as_ref()
    }
}

// ── Dormitories ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dormitory {
    #[serde(flatten)]
    pub id: RecordId,
    pub name: String,
    pub city: String,
    #[serde(default)]
    pub gender_policy: String,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ModerationStatus,
    #[serde(default)]
    pub owner: Option<Owner>,
    pub created_at: String,
}

impl Resource for Dormitory {
    const PATH: &'static str = "/api/dormitories";
    const COLLECTION_KEY: &'static str = "dormitories";

    fn id(&self) -> &str {
        self.id.as_str()
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
    fn moderation(&self) -> Option<ModerationStatus> {
        Some(self.status)
    }
    fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }
}

// ── Jobs ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(flatten)]
    pub id: RecordId,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    pub status: ModerationStatus,
    #[serde(default, alias = "postedBy")]
    pub owner: Option<Owner>,
    pub created_at: String,
}

impl Resource for Job {
    const PATH: &'static str = "/api/admin/jobs";
    const COLLECTION_KEY: &'static str = "jobs";

    fn id(&self) -> &str {
        self.id.as_str()
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn image(&self) -> Option<&str> {
        self.logo.as_deref()
    }
    fn moderation(&self) -> Option<ModerationStatus> {
        Some(self.status)
    }
    fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }
}

// ── Education ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationProgram {
    #[serde(flatten)]
    pub id: RecordId,
    pub name: String,
    pub institution: String,
    #[serde(default)]
    pub degree_level: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub tuition: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: String,
}

impl Resource for EducationProgram {
    const PATH: &'static str = "/api/education/programs";
    const COLLECTION_KEY: &'static str = "programs";

    fn id(&self) -> &str {
        self.id.as_str()
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

// ── Users ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUser {
    #[serde(flatten)]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: String,
}

fn default_true() -> bool {
    true
}

impl Resource for AccountUser {
    const PATH: &'static str = "/api/admin/users";
    const COLLECTION_KEY: &'static str = "users";

    fn id(&self) -> &str {
        self.id.as_str()
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn image(&self) -> Option<&str> {
        self.avatar.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserStatus {
    pub is_active: bool,
}

// ── Payments ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(flatten)]
    pub id: RecordId,
    pub reference: String,
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub wallet_address: String,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default, alias = "screenshot")]
    pub proof_url: Option<String>,
    pub status: PaymentStatus,
    #[serde(default, alias = "user")]
    pub payer: Option<Owner>,
    pub created_at: String,
}

impl Resource for Payment {
    const PATH: &'static str = "/api/admin/payments";
    const COLLECTION_KEY: &'static str = "payments";

    fn id(&self) -> &str {
        self.id.as_str()
    }
    fn title(&self) -> &str {
        &self.reference
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn image(&self) -> Option<&str> {
        self.proof_url.as_deref()
    }
    fn owner(&self) -> Option<&Owner> {
        self.payer.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentStats {
    pub total: u64,
    pub awaiting_payment: u64,
    pub proof_submitted: u64,
    pub verified: u64,
    pub rejected: u64,
    pub verified_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProof {
    pub tx_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayment {
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ── Moderation ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModerationStats {
    pub pending_listings: u64,
    pub pending_jobs: u64,
    pub pending_promotions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationDecision {
    pub status: ModerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ── Promotions ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    #[serde(flatten)]
    pub id: RecordId,
    pub listing_title: String,
    pub plan: String,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub ends_at: Option<String>,
    pub status: ModerationStatus,
    #[serde(default)]
    pub owner: Option<Owner>,
    pub created_at: String,
}

impl Resource for Promotion {
    const PATH: &'static str = "/api/promotions";
    const COLLECTION_KEY: &'static str = "promotions";

    fn id(&self) -> &str {
        self.id.as_str()
    }
    fn title(&self) -> &str {
        &self.listing_title
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn moderation(&self) -> Option<ModerationStatus> {
        Some(self.status)
    }
    fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }
}

// ── Global search ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub id: RecordId,
    #[serde(alias = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    pub url: String,
    #[serde(default)]
    pub created_at: String,
}

impl Resource for SearchHit {
    const PATH: &'static str = "/api/search";
    const COLLECTION_KEY: &'static str = "results";

    fn id(&self) -> &str {
        self.id.as_str()
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn created_at(&self) -> &str {
        &self.created_at
    }
    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_accepts_mongo_style_ids() {
        let listing: Listing = serde_json::from_value(json!({
            "_id": "65f0",
            "title": "Sea view villa",
            "price": 1200.0,
            "city": "Kyrenia",
            "category": "villa",
            "images": ["https://cdn.example/v.jpg"],
            "status": "approved",
            "owner": { "_id": "u1", "username": "selin" },
            "createdAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(listing.id(), "65f0");
        assert_eq!(listing.image(), Some("https://cdn.example/v.jpg"));
        assert_eq!(listing.owner().map(|o| o.name.as_str()), Some("selin"));
        assert_eq!(listing.moderation(), Some(ModerationStatus::Approved));
    }

    #[test]
    fn documents_with_both_id_keys_decode() {
        let listing: Listing = serde_json::from_value(json!({
            "_id": "65f0",
            "id": "65f0",
            "title": "Sea view villa",
            "price": 1200.0,
            "city": "Kyrenia",
            "category": "villa",
            "status": "approved",
            "owner": { "_id": "u1", "id": "u1", "name": "Selin" },
            "createdAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(listing.id(), "65f0");
        assert_eq!(listing.owner().map(|o| o.id.as_str()), Some("u1"));

        let only_id: Owner = serde_json::from_value(json!({ "id": "u2", "name": "Ali" })).unwrap();
        assert_eq!(only_id.id.to_string(), "u2");

        assert!(serde_json::from_value::<Owner>(json!({ "name": "Nobody" })).is_err());
    }

    #[test]
    fn record_id_serializes_as_plain_id() {
        let owner = Owner { id: RecordId::from("u1"), name: "Selin".into() };
        assert_eq!(serde_json::to_value(owner).unwrap(), json!({ "id": "u1", "name": "Selin" }));
    }

    #[test]
    fn unknown_statuses_do_not_fail_decoding() {
        let status: ModerationStatus = serde_json::from_value(json!("archived")).unwrap();
        assert_eq!(status, ModerationStatus::Unknown);

        let status: PaymentStatus = serde_json::from_value(json!("refunded")).unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }

    #[test]
    fn payment_status_aliases() {
        let status: PaymentStatus = serde_json::from_value(json!("pending")).unwrap();
        assert_eq!(status, PaymentStatus::AwaitingPayment);

        let status: PaymentStatus = serde_json::from_value(json!("submitted")).unwrap();
        assert_eq!(status, PaymentStatus::ProofSubmitted);

        assert_eq!(
            serde_json::to_value(PaymentStatus::ProofSubmitted).unwrap(),
            json!("proof_submitted")
        );
    }

    #[test]
    fn admin_listing_is_transparent() {
        let admin: AdminListing = serde_json::from_value(json!({
            "id": "l1",
            "title": "Studio",
            "price": 300,
            "city": "Famagusta",
            "category": "apartment",
            "status": "pending",
            "createdAt": "2024-01-01"
        }))
        .unwrap();

        assert_eq!(admin.title(), "Studio");
        assert_eq!(admin.moderation(), Some(ModerationStatus::Pending));
        assert!(admin.image().is_none());
    }

    #[test]
    fn account_user_defaults_to_active() {
        let user: AccountUser = serde_json::from_value(json!({
            "_id": "u9",
            "name": "Deniz",
            "email": "deniz@example.com",
            "role": "landlord",
            "createdAt": "2024-02-02"
        }))
        .unwrap();
        assert!(user.is_active);
    }
}
