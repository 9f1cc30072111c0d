use anyhow::Result;

#[async_trait::async_trait]
pub trait Actor: Send + Sync + 'static {
    async fn run(self) -> Result<()>;
}

// ----------- Domain messages -----------------

/// One inbound chat message, exactly as received. Consumed once by the
/// pipeline and not retained.
#[derive(Clone, Debug)]
pub struct RawMessage {
    pub chat_id: i64,
    pub chat_title: String,
    pub text: String,
}

/// Structured extraction from a well-formed "new forecast" message.
/// Exists only if the line grammar fully validated and the raw text carried
/// no outcome token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictionRequest {
    /// Public listing slug of the tipster, matched case-sensitively.
    pub capper: String,
    pub sport: String,
    pub league: String,
    /// Raw two-party matchup string, dash-separated, trailing comma stripped.
    pub teams: String,
    /// Start-time string in the source locale, passed through verbatim.
    pub date: String,
    /// Coefficient already present in the source message. Display fallback
    /// only, never authoritative.
    pub declared_coef: Option<String>,
}

/// One scraped row of the capper's public listing. No fixed schema: the
/// outcome and coefficient move around depending on the rendering, so the
/// resolver searches the sub-regions rather than indexing them.
#[derive(Clone, Debug, Default)]
pub struct WagerEntry {
    /// Text of the region naming the two competing parties.
    pub sides: String,
    /// Outcome cell as rendered in the mobile layout, if present.
    pub mobile_outcome: Option<String>,
    /// Expanded block covering the whole outcome area, if present.
    pub outcome_block: Option<String>,
    /// The entry's full flattened text, whitespace-collapsed.
    pub full_text: String,
}

/// Ordered listing snapshot, most recent entry first.
#[derive(Clone, Debug, Default)]
pub struct WagerDocument {
    pub entries: Vec<WagerEntry>,
}

/// Outcome and coefficient pulled from a matching wager entry. At least one
/// field is non-empty; both empty is "not found", never a valid result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedOutcome {
    pub outcome: String,
    /// May carry a leading `~` meaning "approximately".
    pub coef: String,
}

/// Final rendered notification, routed by capper slug.
#[derive(Clone, Debug)]
pub struct Notification {
    pub capper: String,
    pub text: String,
}
