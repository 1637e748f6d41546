use std::cmp::Ordering;

use crate::{
    domain::CodedEntry,
    modules::AttributeModule,
    storage::{
        item_codec::{put_code_sequence, read_code_sequence},
        tags, AccessError, Dataset, Tag, Vr,
    },
    Error,
};

/// One item of the Real World Value Mapping Sequence: maps a range of stored
/// pixel values to real world values, either linearly or through a lookup
/// table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RealWorldValueMappingItem {
    /// First stored value mapped.
    pub first_value_mapped: i64,
    /// Last stored value mapped.
    pub last_value_mapped: i64,
    /// Intercept of the linear mapping.
    pub intercept: Option<f64>,
    /// Slope of the linear mapping.
    pub slope: Option<f64>,
    /// Lookup table, used when there is no linear mapping.
    pub lut_data: Vec<f64>,
    /// LUT Explanation.
    pub lut_explanation: String,
    /// LUT Label.
    pub lut_label: String,
    /// Unit of the real world values.
    pub measurement_units: Option<CodedEntry>,
}

fn missing(name: &str, tag: Tag) -> Error {
    Error::MissingMandatoryAttribute(format!("{name} {tag}"))
}

fn optional<T>(result: Result<T, AccessError>) -> Result<Option<T>, Error> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AccessError::NotFound(_) | AccessError::ValueIndex { .. }) => Ok(None),
        Err(error) => Err(Error::Access(error)),
    }
}

fn compare_codes(left: Option<&CodedEntry>, right: Option<&CodedEntry>) -> Ordering {
    let key = |code: Option<&CodedEntry>| {
        code.map(|code| (code.code_value().to_string(), code.coding_scheme().to_string()))
    };
    key(left).cmp(&key(right))
}

impl RealWorldValueMappingItem {
    /// A linear mapping of `first..=last` with the given intercept and slope.
    #[must_use]
    pub fn linear(
        (first, last): (i64, i64),
        intercept: f64,
        slope: f64,
        label: impl Into<String>,
        units: impl Into<CodedEntry>,
    ) -> Self {
        Self {
            first_value_mapped: first,
            last_value_mapped: last,
            intercept: Some(intercept),
            slope: Some(slope),
            lut_label: label.into(),
            measurement_units: Some(units.into()),
            ..Self::default()
        }
    }

    fn read(item: &Dataset) -> Result<Self, Error> {
        let first_tag = tags::REAL_WORLD_VALUE_FIRST_VALUE_MAPPED;
        let first = optional(item.get_integer_at(first_tag, 0))?
            .ok_or_else(|| missing("Real World Value First Value Mapped", first_tag))?;
        let last_tag = tags::REAL_WORLD_VALUE_LAST_VALUE_MAPPED;
        let last = optional(item.get_integer_at(last_tag, 0))?
            .ok_or_else(|| missing("Real World Value Last Value Mapped", last_tag))?;
        Ok(Self {
            first_value_mapped: *first,
            last_value_mapped: *last,
            intercept: optional(item.get_decimal_at(tags::REAL_WORLD_VALUE_INTERCEPT, 0))?.copied(),
            slope: optional(item.get_decimal_at(tags::REAL_WORLD_VALUE_SLOPE, 0))?.copied(),
            lut_data: optional(item.get_decimals(tags::REAL_WORLD_VALUE_LUT_DATA))?
                .map(<[f64]>::to_vec)
                .unwrap_or_default(),
            lut_explanation: item.text_at(tags::LUT_EXPLANATION, 0).unwrap_or_default(),
            lut_label: item.text_at(tags::LUT_LABEL, 0).unwrap_or_default(),
            measurement_units: read_code_sequence(item, tags::MEASUREMENT_UNITS_CODE_SEQUENCE)?,
        })
    }

    fn write(&self) -> Result<Dataset, Error> {
        let linear = self.intercept.zip(self.slope);
        if linear.is_none() && self.lut_data.is_empty() {
            return Err(missing(
                "Real World Value Slope/Intercept or LUT Data",
                tags::REAL_WORLD_VALUE_SLOPE,
            ));
        }
        if self.lut_label.is_empty() {
            return Err(missing("LUT Label", tags::LUT_LABEL));
        }
        let units = self.measurement_units.as_ref().ok_or_else(|| {
            missing("Measurement Units Code Sequence", tags::MEASUREMENT_UNITS_CODE_SEQUENCE)
        })?;

        let mut item = Dataset::new();
        item.put_integers(
            tags::REAL_WORLD_VALUE_FIRST_VALUE_MAPPED,
            Vr::US,
            vec![self.first_value_mapped],
        );
        item.put_integers(
            tags::REAL_WORLD_VALUE_LAST_VALUE_MAPPED,
            Vr::US,
            vec![self.last_value_mapped],
        );
        match linear {
            Some((intercept, slope)) => {
                item.put_decimals(tags::REAL_WORLD_VALUE_INTERCEPT, vec![intercept]);
                item.put_decimals(tags::REAL_WORLD_VALUE_SLOPE, vec![slope]);
            }
            None => item.put_decimals(tags::REAL_WORLD_VALUE_LUT_DATA, self.lut_data.clone()),
        }
        item.put_string(tags::LUT_EXPLANATION, Vr::LO, &self.lut_explanation);
        item.put_string(tags::LUT_LABEL, Vr::SH, &self.lut_label);
        put_code_sequence(&mut item, tags::MEASUREMENT_UNITS_CODE_SEQUENCE, units);
        Ok(item)
    }

    /// Orders two items attribute by attribute.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        let lut = |item: &Self| item.lut_data.len();
        self.first_value_mapped
            .cmp(&other.first_value_mapped)
            .then(self.last_value_mapped.cmp(&other.last_value_mapped))
            .then_with(|| compare_float(self.intercept, other.intercept))
            .then_with(|| compare_float(self.slope, other.slope))
            .then(lut(self).cmp(&lut(other)))
            .then_with(|| {
                self.lut_data
                    .iter()
                    .zip(&other.lut_data)
                    .map(|(left, right)| left.total_cmp(right))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.lut_explanation.cmp(&other.lut_explanation))
            .then_with(|| self.lut_label.cmp(&other.lut_label))
            .then_with(|| {
                compare_codes(self.measurement_units.as_ref(), other.measurement_units.as_ref())
            })
    }
}

fn compare_float(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (left, right) => left.is_some().cmp(&right.is_some()),
    }
}

/// Real World Value Mapping functional group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RealWorldValueMapping {
    items: Vec<RealWorldValueMappingItem>,
}

impl RealWorldValueMapping {
    /// The mapping items.
    #[must_use]
    pub fn items(&self) -> &[RealWorldValueMappingItem] {
        &self.items
    }

    /// Appends a mapping item.
    pub fn add_item(&mut self, item: RealWorldValueMappingItem) {
        self.items.push(item);
    }

    /// Orders two functional groups. A group with fewer items orders after
    /// one with more; groups of equal size are compared item by item.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match self.items.len().cmp(&other.items.len()) {
            Ordering::Less => return Ordering::Greater,
            Ordering::Greater => return Ordering::Less,
            Ordering::Equal => {}
        }
        (0..self.items.len())
            .map(|index| self.items[index].compare(&other.items[index]))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl AttributeModule for RealWorldValueMapping {
    /// Reads the mapping items. The previous items are always replaced.
    fn read(&mut self, dataset: &Dataset, _clear_old: bool) -> Result<(), Error> {
        self.items = optional(dataset.get_items(tags::REAL_WORLD_VALUE_MAPPING_SEQUENCE))?
            .unwrap_or_default()
            .iter()
            .map(RealWorldValueMappingItem::read)
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn write(&self, dataset: &mut Dataset) -> Result<(), Error> {
        if self.items.is_empty() {
            return Err(missing(
                "Real World Value Mapping Sequence",
                tags::REAL_WORLD_VALUE_MAPPING_SEQUENCE,
            ));
        }
        let items = self
            .items
            .iter()
            .map(RealWorldValueMappingItem::write)
            .collect::<Result<_, _>>()?;
        dataset.put_items(tags::REAL_WORLD_VALUE_MAPPING_SEQUENCE, items);
        Ok(())
    }

    fn clear_data(&mut self) {
        self.items.clear();
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::ucum;

    fn item(slope: f64) -> RealWorldValueMappingItem {
        RealWorldValueMappingItem::linear((0, 4095), -1024.0, slope, "HU", ucum::MMOL_PER_L)
    }

    #[test]
    fn items_round_trip_through_the_sequence() {
        let mut mapping = RealWorldValueMapping::default();
        mapping.add_item(item(1.0));
        let mut lut = item(1.0);
        lut.intercept = None;
        lut.slope = None;
        lut.lut_data = vec![0.5, 1.5];
        lut.lut_explanation = "table".to_string();
        mapping.add_item(lut);

        let mut dataset = Dataset::new();
        mapping.write(&mut dataset).unwrap();
        let mut read = RealWorldValueMapping::default();
        read.read(&dataset, true).unwrap();
        assert_eq!(read, mapping);
        assert_eq!(read.compare(&mapping), Ordering::Equal);
    }

    #[test]
    fn compare_by_size_then_items() {
        let mut one = RealWorldValueMapping::default();
        one.add_item(item(1.0));
        let mut two = one.clone();
        two.add_item(item(2.0));
        assert_eq!(one.compare(&two), Ordering::Greater);
        assert_eq!(two.compare(&one), Ordering::Less);

        let mut steeper = RealWorldValueMapping::default();
        steeper.add_item(item(2.0));
        assert_eq!(one.compare(&steeper), Ordering::Less);
        let empty = RealWorldValueMapping::default();
        assert_eq!(empty.compare(&RealWorldValueMapping::default()), Ordering::Equal);
    }

    #[test]
    fn item_needs_a_mapping() {
        let mut mapping = RealWorldValueMapping::default();
        let mut incomplete = item(1.0);
        incomplete.slope = None;
        mapping.add_item(incomplete);
        let error = mapping.write(&mut Dataset::new()).unwrap_err();
        assert!(matches!(error, Error::MissingMandatoryAttribute(_)));
    }
}
