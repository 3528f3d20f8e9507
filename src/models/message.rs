use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Sent,
    Read,
    Archived,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Read => "read",
            MessageStatus::Archived => "archived",
        }
    }
}

/// Enquiry sent by a buyer to the owner of a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub body: String,
    #[serde(default)]
    pub status: MessageStatus,
    pub sender_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_phone: Option<String>,
    pub property_id: String,
    pub receiver_user_id: String,
}

/// Caller-supplied fields of a new message. The receiver is the listing owner.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub body: String,
    pub sender_email: String,
    #[serde(default)]
    pub sender_phone: Option<String>,
    pub property_id: String,
}

impl Message {
    pub fn create(id: String, details: NewMessage, receiver_user_id: String) -> Self {
        Self {
            id,
            body: details.body,
            status: MessageStatus::Sent,
            sender_email: details.sender_email,
            sender_phone: details.sender_phone,
            property_id: details.property_id,
            receiver_user_id,
        }
    }
}
