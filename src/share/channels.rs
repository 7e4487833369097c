//! Share channels and their deep links

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Characters left unescaped in a URL component: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single URL component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Where a share can go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    WhatsApp,
    Telegram,
    Facebook,
    Twitter,
    LinkedIn,
    Instagram,
    Messenger,
    Email,
    Sms,
    NativeSystemShare,
}

impl ShareTarget {
    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            ShareTarget::WhatsApp => "WhatsApp",
            ShareTarget::Telegram => "Telegram",
            ShareTarget::Facebook => "Facebook",
            ShareTarget::Twitter => "Twitter",
            ShareTarget::LinkedIn => "LinkedIn",
            ShareTarget::Instagram => "Instagram",
            ShareTarget::Messenger => "Messenger",
            ShareTarget::Email => "Email",
            ShareTarget::Sms => "SMS",
            ShareTarget::NativeSystemShare => "System Share",
        }
    }

    /// Channels offered on the manual selection surface, in menu order.
    pub fn channels() -> &'static [ShareTarget] {
        &[
            ShareTarget::WhatsApp,
            ShareTarget::Telegram,
            ShareTarget::Facebook,
            ShareTarget::Twitter,
            ShareTarget::LinkedIn,
            ShareTarget::Instagram,
            ShareTarget::Messenger,
            ShareTarget::Email,
            ShareTarget::Sms,
        ]
    }

    /// Channels without a share URL get the image instead.
    pub fn needs_image(&self) -> bool {
        matches!(self, ShareTarget::Instagram)
    }

    /// Build the compose URL for this channel.
    ///
    /// Returns `None` for targets that have no URL scheme.
    pub fn deep_link(&self, text: &str, link: &str) -> Option<String> {
        let text_enc = encode_component(text);
        let link_enc = encode_component(link);
        // Channels with a single body field get "text link"
        let combined = if link.is_empty() {
            text_enc.clone()
        } else {
            format!("{}%20{}", text_enc, link_enc)
        };

        let url = match self {
            ShareTarget::WhatsApp => format!("https://wa.me/?text={}", combined),
            ShareTarget::Telegram => {
                format!("https://t.me/share/url?url={}&text={}", link_enc, text_enc)
            }
            ShareTarget::Facebook => format!(
                "https://www.facebook.com/sharer/sharer.php?u={}&quote={}",
                link_enc, text_enc
            ),
            ShareTarget::Twitter => format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                text_enc, link_enc
            ),
            ShareTarget::LinkedIn => format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}&summary={}",
                link_enc, text_enc
            ),
            ShareTarget::Messenger => format!("https://www.messenger.com/t/?link={}", link_enc),
            ShareTarget::Email => format!(
                "https://mail.google.com/mail/?view=cm&su={}&body={}",
                text_enc, link_enc
            ),
            ShareTarget::Sms => format!("sms:?body={}", combined),
            ShareTarget::Instagram | ShareTarget::NativeSystemShare => return None,
        };
        Some(url)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
