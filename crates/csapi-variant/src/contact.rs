//! Contact family: a responsible party, or a link to contact details held
//! elsewhere. There is no discriminator; a `link` member selects the link.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::variant::{decode_as, EmitPolicy, Family, Variant};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voice: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facsimile: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delivery_point: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub electronic_mail_address: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_of_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_instructions: Option<String>,
}

/// A person or an organisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A web link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    /// Media type of the target.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// Contact details published at `link`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub link: Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactTag {
    Party,
    Link,
}

impl fmt::Display for ContactTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContactTag::Party => "Party",
            ContactTag::Link => "Link",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Contact {
    Party(Party),
    Link(ContactLink),
}

/// Members read regardless of shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactShared {
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFamily;

impl Family for ContactFamily {
    const NAME: &'static str = "contact";
    const DISCRIMINATOR: Option<&'static str> = None;
    const EMIT: EmitPolicy = EmitPolicy::Replay;

    type Tag = ContactTag;
    type Shape = Contact;
    type Shared = ContactShared;

    fn tag_of(_name: &str) -> Option<ContactTag> {
        None
    }

    fn shape_tag(shape: &Contact) -> ContactTag {
        match shape {
            Contact::Party(_) => ContactTag::Party,
            Contact::Link(_) => ContactTag::Link,
        }
    }

    fn decode(tag: ContactTag, raw: &[u8], _value: &Value) -> Result<Contact, String> {
        match tag {
            ContactTag::Party => decode_as(raw).map(Contact::Party),
            ContactTag::Link => decode_as(raw).map(Contact::Link),
        }
    }

    fn probe(value: &Value) -> Vec<ContactTag> {
        if value.get("link").is_some() {
            vec![ContactTag::Link]
        } else {
            vec![ContactTag::Party]
        }
    }

    fn shared(value: &Value) -> ContactShared {
        ContactShared {
            role: value.get("role").and_then(Value::as_str).map(str::to_owned),
        }
    }

    fn reconstruct(shape: &Contact, _shared: &ContactShared) -> Value {
        serde_json::to_value(shape).unwrap_or_default()
    }
}

impl Variant<ContactFamily> {
    pub fn role(&self) -> Option<&str> {
        self.shared().role.as_deref()
    }

    pub fn as_party(&self) -> Option<&Party> {
        match self.shape() {
            Some(Contact::Party(p)) => Some(p),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&ContactLink> {
        match self.shape() {
            Some(Contact::Link(l)) => Some(l),
            _ => None,
        }
    }

    /// The individual's name, else the organisation's, else the link name.
    pub fn display_name(&self) -> Option<&str> {
        match self.shape()? {
            Contact::Party(p) => p
                .individual_name
                .as_deref()
                .or(p.organisation_name.as_deref()),
            Contact::Link(l) => l.name.as_deref(),
        }
    }
}
