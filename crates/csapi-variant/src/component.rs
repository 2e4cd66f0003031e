//! Data component family: the eleven scalar, range and aggregate shapes.
//!
//! Components are echoed back as received, so decoded values replay their
//! raw bytes and unknown members survive a round-trip.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constraint::ConstraintFamily;
use crate::scalar::NumberOrString;
use crate::variant::{decode_as, tagged_object, EmitPolicy, Family, Variant};

/// Unit of measure: a UCUM code or a unit URI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A reserved value standing for "no data", with the reason it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NilValue {
    pub reason: String,
    pub value: NumberOrString,
}

/// Members every component may carry, whatever its type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentShared {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<UnitReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Variant<ConstraintFamily>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nil_values: Vec<NilValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updatable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooleanComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

/// `value` may be a number or one of the special strings such as `NaN`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantityComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<NumberOrString>,
}

/// `value` is an ISO-8601 string or a number of `uom` units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_frame: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<NumberOrString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountRangeComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<[i64; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantityRangeComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<[NumberOrString; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_frame: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<[NumberOrString; 2]>,
}

/// A coordinate list expressed in a reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorComponent {
    pub reference_frame: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_frame: Option<String>,
    pub coordinates: Vec<Variant<ComponentFamily>>,
}

/// A homogeneous array of `element_type` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataArrayComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_count: Option<Value>,
    pub element_type: Box<Variant<ComponentFamily>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentTag {
    Boolean,
    Count,
    Quantity,
    Time,
    Category,
    Text,
    CountRange,
    QuantityRange,
    TimeRange,
    Vector,
    DataArray,
}

impl ComponentTag {
    pub const ALL: [ComponentTag; 11] = [
        ComponentTag::Boolean,
        ComponentTag::Count,
        ComponentTag::Quantity,
        ComponentTag::Time,
        ComponentTag::Category,
        ComponentTag::Text,
        ComponentTag::CountRange,
        ComponentTag::QuantityRange,
        ComponentTag::TimeRange,
        ComponentTag::Vector,
        ComponentTag::DataArray,
    ];

    /// Canonical `type` value.
    pub fn name(self) -> &'static str {
        match self {
            ComponentTag::Boolean => "Boolean",
            ComponentTag::Count => "Count",
            ComponentTag::Quantity => "Quantity",
            ComponentTag::Time => "Time",
            ComponentTag::Category => "Category",
            ComponentTag::Text => "Text",
            ComponentTag::CountRange => "CountRange",
            ComponentTag::QuantityRange => "QuantityRange",
            ComponentTag::TimeRange => "TimeRange",
            ComponentTag::Vector => "Vector",
            ComponentTag::DataArray => "DataArray",
        }
    }

    /// Accepts the canonical names plus `Array` for `DataArray`.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "Array" {
            return Some(ComponentTag::DataArray);
        }
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for ComponentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Boolean(BooleanComponent),
    Count(CountComponent),
    Quantity(QuantityComponent),
    Time(TimeComponent),
    Category(CategoryComponent),
    Text(TextComponent),
    CountRange(CountRangeComponent),
    QuantityRange(QuantityRangeComponent),
    TimeRange(TimeRangeComponent),
    Vector(VectorComponent),
    DataArray(DataArrayComponent),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentFamily;

impl Family for ComponentFamily {
    const NAME: &'static str = "component";
    const DISCRIMINATOR: Option<&'static str> = Some("type");
    const EMIT: EmitPolicy = EmitPolicy::Replay;

    type Tag = ComponentTag;
    type Shape = Component;
    type Shared = ComponentShared;

    fn tag_of(name: &str) -> Option<ComponentTag> {
        ComponentTag::from_name(name)
    }

    fn shape_tag(shape: &Component) -> ComponentTag {
        match shape {
            Component::Boolean(_) => ComponentTag::Boolean,
            Component::Count(_) => ComponentTag::Count,
            Component::Quantity(_) => ComponentTag::Quantity,
            Component::Time(_) => ComponentTag::Time,
            Component::Category(_) => ComponentTag::Category,
            Component::Text(_) => ComponentTag::Text,
            Component::CountRange(_) => ComponentTag::CountRange,
            Component::QuantityRange(_) => ComponentTag::QuantityRange,
            Component::TimeRange(_) => ComponentTag::TimeRange,
            Component::Vector(_) => ComponentTag::Vector,
            Component::DataArray(_) => ComponentTag::DataArray,
        }
    }

    fn decode(tag: ComponentTag, raw: &[u8], _value: &Value) -> Result<Component, String> {
        match tag {
            ComponentTag::Boolean => decode_as(raw).map(Component::Boolean),
            ComponentTag::Count => decode_as(raw).map(Component::Count),
            ComponentTag::Quantity => decode_as(raw).map(Component::Quantity),
            ComponentTag::Time => decode_as(raw).map(Component::Time),
            ComponentTag::Category => decode_as(raw).map(Component::Category),
            ComponentTag::Text => decode_as(raw).map(Component::Text),
            ComponentTag::CountRange => decode_as(raw).map(Component::CountRange),
            ComponentTag::QuantityRange => decode_as(raw).map(Component::QuantityRange),
            ComponentTag::TimeRange => decode_as(raw).map(Component::TimeRange),
            ComponentTag::Vector => decode_as(raw).map(Component::Vector),
            ComponentTag::DataArray => decode_as(raw).map(Component::DataArray),
        }
    }

    /// Components are only ever selected by `type`.
    fn probe(_value: &Value) -> Vec<ComponentTag> {
        Vec::new()
    }

    fn shared(value: &Value) -> ComponentShared {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);
        let flag = |key: &str| value.get(key).and_then(Value::as_bool);
        ComponentShared {
            name: text("name"),
            id: text("id"),
            definition: text("definition"),
            label: text("label"),
            description: text("description"),
            uom: value
                .get("uom")
                .and_then(|uom| UnitReference::deserialize(uom).ok()),
            constraint: value.get("constraint").map(Variant::from_value),
            nil_values: value
                .get("nilValues")
                .and_then(|nil| Vec::<NilValue>::deserialize(nil).ok())
                .unwrap_or_default(),
            optional: flag("optional"),
            updatable: flag("updatable"),
        }
    }

    fn reconstruct(shape: &Component, shared: &ComponentShared) -> Value {
        let shared = serde_json::to_value(shared).unwrap_or_default();
        let fields = serde_json::to_value(shape).unwrap_or_default();
        tagged_object("type", Self::shape_tag(shape).name(), &[shared, fields])
    }
}

/// Typed accessors over a component variant.
impl Variant<ComponentFamily> {
    pub fn name(&self) -> Option<&str> {
        self.shared().name.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.shared().label.as_deref()
    }

    pub fn definition(&self) -> Option<&str> {
        self.shared().definition.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.shared().description.as_deref()
    }

    pub fn uom(&self) -> Option<&UnitReference> {
        self.shared().uom.as_ref()
    }

    pub fn constraint(&self) -> Option<&Variant<ConstraintFamily>> {
        self.shared().constraint.as_ref()
    }

    pub fn as_quantity(&self) -> Option<&QuantityComponent> {
        match self.shape() {
            Some(Component::Quantity(q)) => Some(q),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<&CountComponent> {
        match self.shape() {
            Some(Component::Count(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_category(&self) -> Option<&CategoryComponent> {
        match self.shape() {
            Some(Component::Category(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorComponent> {
        match self.shape() {
            Some(Component::Vector(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_data_array(&self) -> Option<&DataArrayComponent> {
        match self.shape() {
            Some(Component::DataArray(a)) => Some(a),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Resolution;
    use serde_json::json;

    type ComponentVariant = Variant<ComponentFamily>;

    #[test]
    fn quantity_with_shared_fields() {
        let v = ComponentVariant::resolve(
            br#"{"type":"Quantity","definition":"http://qudt.org/vocab/quantitykind/Temperature",
                "label":"Air Temperature","uom":{"code":"Cel"},"value":21.5,
                "constraint":{"type":"AllowedValues","intervals":[[-50,60]]}}"#,
        )
        .unwrap();
        assert_eq!(v.label(), Some("Air Temperature"));
        assert_eq!(v.uom().and_then(|u| u.code.as_deref()), Some("Cel"));
        let q = v.as_quantity().unwrap();
        assert_eq!(q.value.as_ref().and_then(NumberOrString::as_f64), Some(21.5));
        let allowed = v.constraint().and_then(|c| c.as_allowed_values()).unwrap();
        assert!(allowed.permits(21.5));
    }

    #[test]
    fn array_alias_and_nested_components() {
        let v = ComponentVariant::resolve(
            br#"{"type":"Array","elementCount":{"type":"Count","value":2},
                "elementType":{"type":"Vector","referenceFrame":"http://www.opengis.net/def/crs/EPSG/0/4979",
                  "coordinates":[{"name":"lat","type":"Quantity","uom":{"code":"deg"}},
                                 {"name":"lon","type":"Quantity","uom":{"code":"deg"}}]}}"#,
        )
        .unwrap();
        assert_eq!(v.resolution(), &Resolution::Discriminated(ComponentTag::DataArray));
        let array = v.as_data_array().unwrap();
        let vector = array.element_type.as_vector().unwrap();
        let names: Vec<_> = vector.coordinates.iter().filter_map(|c| c.name()).collect();
        assert_eq!(names, ["lat", "lon"]);
    }

    #[test]
    fn unknown_type_is_opaque_with_shared_fields_and_exact_bytes() {
        let text = br#"{ "type": "FutureType", "label": "Next", "uom": {"code": "m"},
            "nilValues": [{"reason": "http://www.opengis.net/def/nil/OGC/0/missing", "value": -9999}],
            "shinyNewField": [1, 2, 3] }"#;
        let v = ComponentVariant::resolve(text).unwrap();
        assert!(v.is_opaque());
        assert_eq!(v.label(), Some("Next"));
        assert_eq!(v.shared().nil_values.len(), 1);
        assert_eq!(v.to_vec(), text.to_vec());
        assert_eq!(serde_json::to_vec(&v).unwrap(), text.to_vec());
    }

    #[test]
    fn wrong_value_type_is_opaque_not_another_shape() {
        let v = ComponentVariant::resolve(br#"{"type":"Count","value":1.5}"#).unwrap();
        match v.resolution() {
            Resolution::Opaque { declared, attempts } => {
                assert_eq!(declared.as_deref(), Some("Count"));
                assert_eq!(attempts[0].tag, ComponentTag::Count);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn constructed_component_reconstructs() {
        let shared = ComponentShared {
            name: Some("flag".into()),
            label: Some("Flag".into()),
            ..ComponentShared::default()
        };
        let v = ComponentVariant::new(
            Component::Boolean(BooleanComponent { value: Some(true) }),
            shared,
        );
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"type":"Boolean","name":"flag","label":"Flag","value":true}"#
        );
    }

    #[test]
    fn every_tag_round_trips_its_name() {
        for tag in ComponentTag::ALL {
            assert_eq!(ComponentTag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(ComponentTag::from_name("DataRecord"), None);
    }
}
