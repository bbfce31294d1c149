use serde::{Deserialize, Serialize};

/// Optional contact channels a user may reveal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBundle {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub telegram: Option<String>,
    pub whatsapp: Option<String>,
    pub facebook: Option<String>,
    pub viber: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactChannel {
    Phone,
    Email,
    Telegram,
    Whatsapp,
    Facebook,
    Viber,
}

/// One renderable contact line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    pub channel: ContactChannel,
    pub value: String,
}

impl ContactBundle {
    /// Present, non-blank channels in display order.
    pub fn entries(&self) -> Vec<ContactEntry> {
        [
            (ContactChannel::Phone, &self.phone),
            (ContactChannel::Email, &self.email),
            (ContactChannel::Telegram, &self.telegram),
            (ContactChannel::Whatsapp, &self.whatsapp),
            (ContactChannel::Facebook, &self.facebook),
            (ContactChannel::Viber, &self.viber),
        ]
        .into_iter()
        .filter_map(|(channel, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| ContactEntry {
                    channel,
                    value: v.to_string(),
                })
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
