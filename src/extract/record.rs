//! The flat request record and its field names.

use serde::Serialize;

/// Declares [`Field`] and [`ParsedRequestRecord`] from one list so the two
/// can never disagree on the field set or the external names.
macro_rules! record_fields {
    ($($variant:ident => $field:ident, $name:tt;)*) => {
        /// Output field of a [`ParsedRequestRecord`]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Field {
            $($variant,)*
        }

        impl Field {
            /// Every field, in record order
            pub const ALL: &'static [Field] = &[$(Field::$variant,)*];

            /// Stable external name used by downstream mappings
            pub fn name(self) -> &'static str {
                match self {
                    $(Field::$variant => $name,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Field> {
                match name {
                    $($name => Some(Field::$variant),)*
                    _ => None,
                }
            }
        }

        /// Extracted request. Every field is always present; misses are empty.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        pub struct ParsedRequestRecord {
            $(
                #[serde(rename = $name)]
                pub $field: String,
            )*
        }

        impl ParsedRequestRecord {
            pub fn get(&self, field: Field) -> &str {
                match field {
                    $(Field::$variant => &self.$field,)*
                }
            }

            pub fn set(&mut self, field: Field, value: impl Into<String>) {
                match field {
                    $(Field::$variant => self.$field = value.into(),)*
                }
            }
        }
    };
}

record_fields! {
    RequestDate => request_date, "requestDate";
    RequestDateLabel => request_date_label, "requestDateLabel";
    AssessmentNumber => assessment_number, "assessmentNumber";
    Brand => brand, "brand";
    Model => model, "model";
    Grade => grade, "grade";
    ModelYear => model_year, "modelYear";
    Mileage => mileage, "mileage";
    BodyColor => body_color, "bodyColor";
    DoorCount => door_count, "doorCount";
    BodyType => body_type, "bodyType";
    Displacement => displacement, "displacement";
    Transmission => transmission, "transmission";
    DriveType => drive_type, "driveType";
    FuelType => fuel_type, "fuelType";
    VehicleCondition => vehicle_condition, "vehicleCondition";
    AccidentHistory => accident_history, "accidentHistory";
    InspectionExpiry => inspection_expiry, "inspectionExpiry";
    SaleTiming => sale_timing, "saleTiming";
    ModelCode => model_code, "modelCode";
    EquipmentInfo => equipment_info, "equipmentInfo";
    ChassisNumber => chassis_number, "chassisNumber";
    Name => name, "name";
    NameKana => name_kana, "nameKana";
    Phone => phone, "phone";
    Email => email, "email";
    PostalCode => postal_code, "postalCode";
    State => state, "state";
    City => city, "city";
    Address => address, "address";
    Remarks => remarks, "remarks";
}

impl ParsedRequestRecord {
    /// `(name, value)` pairs in record order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        Field::ALL.iter().map(|&field| (field.name(), self.get(field)))
    }
}
