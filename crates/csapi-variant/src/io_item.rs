//! Input/output item family: an inline observable property, or a full data
//! component.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{ComponentFamily, ComponentTag};
use crate::variant::{decode_as, tagged_object, EmitPolicy, Family, Variant};

const OBSERVABLE_PROPERTY: &str = "ObservableProperty";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableProperty {
    pub definition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoTag {
    ObservableProperty,
    Component,
}

impl fmt::Display for IoTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoTag::ObservableProperty => OBSERVABLE_PROPERTY,
            IoTag::Component => "Component",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IoItem {
    ObservableProperty(ObservableProperty),
    /// Always holds a resolved component shape.
    Component(Box<Variant<ComponentFamily>>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IoShared {
    pub name: Option<String>,
    pub label: Option<String>,
    pub definition: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoItemFamily;

impl Family for IoItemFamily {
    const NAME: &'static str = "io-item";
    const DISCRIMINATOR: Option<&'static str> = Some("type");
    const EMIT: EmitPolicy = EmitPolicy::Replay;

    type Tag = IoTag;
    type Shape = IoItem;
    type Shared = IoShared;

    fn tag_of(name: &str) -> Option<IoTag> {
        if name == OBSERVABLE_PROPERTY {
            Some(IoTag::ObservableProperty)
        } else {
            ComponentTag::from_name(name).map(|_| IoTag::Component)
        }
    }

    fn shape_tag(shape: &IoItem) -> IoTag {
        match shape {
            IoItem::ObservableProperty(_) => IoTag::ObservableProperty,
            IoItem::Component(_) => IoTag::Component,
        }
    }

    fn decode(tag: IoTag, raw: &[u8], _value: &Value) -> Result<IoItem, String> {
        match tag {
            IoTag::ObservableProperty => decode_as(raw).map(IoItem::ObservableProperty),
            IoTag::Component => {
                let component =
                    Variant::<ComponentFamily>::resolve(raw).map_err(|err| err.to_string())?;
                if component.is_opaque() {
                    return Err("not a known data component".to_owned());
                }
                Ok(IoItem::Component(Box::new(component)))
            }
        }
    }

    /// An unrecognised `type` may still be a component.
    fn probe(_value: &Value) -> Vec<IoTag> {
        vec![IoTag::Component]
    }

    fn shared(value: &Value) -> IoShared {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);
        IoShared {
            name: text("name"),
            label: text("label"),
            definition: text("definition"),
        }
    }

    fn reconstruct(shape: &IoItem, shared: &IoShared) -> Value {
        let name = shared
            .name
            .as_ref()
            .map(|name| serde_json::json!({ "name": name }))
            .unwrap_or_default();
        match shape {
            IoItem::ObservableProperty(property) => {
                let fields = serde_json::to_value(property).unwrap_or_default();
                tagged_object("type", OBSERVABLE_PROPERTY, &[name, fields])
            }
            IoItem::Component(component) => {
                let mut out = component.to_json_value();
                if let (Value::Object(fields), Value::Object(extra)) = (&mut out, name) {
                    for (k, v) in extra {
                        fields.entry(k).or_insert(v);
                    }
                }
                out
            }
        }
    }
}

impl Variant<IoItemFamily> {
    pub fn name(&self) -> Option<&str> {
        self.shared().name.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.shared().label.as_deref()
    }

    pub fn definition(&self) -> Option<&str> {
        self.shared().definition.as_deref()
    }

    pub fn as_observable_property(&self) -> Option<&ObservableProperty> {
        match self.shape() {
            Some(IoItem::ObservableProperty(p)) => Some(p),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Variant<ComponentFamily>> {
        match self.shape() {
            Some(IoItem::Component(c)) => Some(c.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Resolution;

    type IoVariant = Variant<IoItemFamily>;

    #[test]
    fn inline_observable_property() {
        let v = IoVariant::resolve(
            br#"{"type":"ObservableProperty","name":"temp","definition":"http://qudt.org/vocab/quantitykind/Temperature","label":"Temperature"}"#,
        )
        .unwrap();
        assert_eq!(v.resolution(), &Resolution::Discriminated(IoTag::ObservableProperty));
        assert_eq!(v.name(), Some("temp"));
        assert_eq!(v.as_observable_property().unwrap().label.as_deref(), Some("Temperature"));
    }

    #[test]
    fn component_item_delegates() {
        let v = IoVariant::resolve(
            br#"{"type":"Quantity","name":"temp","definition":"http://example.org/temp","uom":{"code":"Cel"}}"#,
        )
        .unwrap();
        assert_eq!(v.resolution(), &Resolution::Discriminated(IoTag::Component));
        let component = v.as_component().unwrap();
        assert_eq!(component.tag(), Some(ComponentTag::Quantity));
        assert_eq!(component.uom().and_then(|u| u.code.as_deref()), Some("Cel"));
    }

    #[test]
    fn unknown_component_type_is_opaque() {
        let text = br#"{"type":"DataRecord","name":"rec","fields":[]}"#;
        let v = IoVariant::resolve(text).unwrap();
        match v.resolution() {
            Resolution::Opaque { declared, attempts } => {
                assert_eq!(declared.as_deref(), Some("DataRecord"));
                assert_eq!(attempts.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(v.name(), Some("rec"));
        assert_eq!(v.to_vec(), text.to_vec());
    }

    #[test]
    fn observable_property_without_definition_is_opaque() {
        let v = IoVariant::resolve(br#"{"type":"ObservableProperty","label":"x"}"#).unwrap();
        assert!(v.is_opaque());
    }

    #[test]
    fn constructed_property_reconstructs_with_name() {
        let shared = IoShared {
            name: Some("wind".into()),
            ..IoShared::default()
        };
        let v = IoVariant::new(
            IoItem::ObservableProperty(ObservableProperty {
                definition: "http://example.org/wind".into(),
                label: None,
                description: None,
            }),
            shared,
        );
        assert_eq!(
            String::from_utf8(v.to_vec()).unwrap(),
            r#"{"type":"ObservableProperty","name":"wind","definition":"http://example.org/wind"}"#
        );
    }
}
