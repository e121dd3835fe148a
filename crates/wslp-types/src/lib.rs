use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AccountAddress(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TokenAddress(pub String);

impl AccountAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TokenAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Raw form text captured on submit. Nothing here is parsed; the bridge
/// operation owns amount and address semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    pub source_token_address: String,
    pub amount: String,
    pub destination_address: String,
}

impl SubmissionInput {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::SourceTokenAddress => &self.source_token_address,
            FormField::Amount => &self.amount,
            FormField::DestinationAddress => &self.destination_address,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    SourceTokenAddress,
    Amount,
    DestinationAddress,
}

impl FormField {
    pub const ALL: [FormField; 3] = [
        FormField::SourceTokenAddress,
        FormField::Amount,
        FormField::DestinationAddress,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormField::SourceTokenAddress => "sourceTokenAddress",
            FormField::Amount => "amount",
            FormField::DestinationAddress => "destinationAddress",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenDescriptor {
    pub address: String,
    pub symbol: String,
    pub name: String,
}

impl TokenDescriptor {
    /// Autocomplete option text.
    pub fn label(&self) -> String {
        format!("{} {}", self.symbol, self.name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoticeId(pub u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticePhase {
    Pending,
    Success,
    Error,
}

impl NoticePhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, NoticePhase::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub phase: NoticePhase,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NoticeMessages {
    pub pending: String,
    pub success: String,
    pub error_fallback: String,
}

impl Default for NoticeMessages {
    fn default() -> Self {
        Self {
            pending: "Processing...".to_owned(),
            success: "Success! Wait for swap.".to_owned(),
            error_fallback: "Unknown error occurred".to_owned(),
        }
    }
}

/// Latest state of a polled balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceView {
    pub value: Option<String>,
    pub loading: bool,
}

impl BalanceView {
    pub fn loading() -> Self {
        Self {
            value: None,
            loading: true,
        }
    }

    pub fn display(&self) -> &str {
        if self.loading {
            "..."
        } else {
            self.value.as_deref().unwrap_or_default()
        }
    }
}
