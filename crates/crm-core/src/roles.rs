//! Contact roles.
//!
//! Each role a contact can hold carries its own small field schema. Roles are
//! a closed enum so adding one forces every `match` on it to be revisited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::enums::FieldType;
use crate::errors::CoreError;

/// A role-specific attribute collected on the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleField {
    pub key: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

const fn field(
    key: &'static str,
    label: &'static str,
    field_type: FieldType,
    required: bool,
) -> RoleField {
    RoleField {
        key,
        label,
        field_type,
        required,
    }
}

const CLIENT_FIELDS: &[RoleField] = &[
    field("medicare_number", "Medicare number", FieldType::String, true),
    field("part_a_effective", "Part A effective date", FieldType::Date, false),
    field("part_b_effective", "Part B effective date", FieldType::Date, false),
    field("current_plan", "Current plan", FieldType::String, false),
];

const PROSPECT_FIELDS: &[RoleField] = &[
    field("lead_source", "Lead source", FieldType::String, true),
    field("turning_65_on", "Turning 65 on", FieldType::Date, false),
    field("follow_up_on", "Follow up on", FieldType::Date, false),
];

const CAREGIVER_FIELDS: &[RoleField] = &[
    field("relationship", "Relationship to client", FieldType::String, true),
    field("has_power_of_attorney", "Power of attorney", FieldType::String, false),
];

const REFERRAL_PARTNER_FIELDS: &[RoleField] = &[
    field("organization", "Organization", FieldType::String, true),
    field("referrals_sent", "Referrals sent", FieldType::Integer, false),
];

const CARRIER_REPRESENTATIVE_FIELDS: &[RoleField] = &[
    field("carrier", "Carrier", FieldType::String, true),
    field("territory", "Territory", FieldType::String, false),
    field("writing_number", "Writing number", FieldType::String, false),
];

/// Role a contact plays for the agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContactRole {
    Client,
    Prospect,
    Caregiver,
    ReferralPartner,
    CarrierRepresentative,
}

impl ContactRole {
    pub const ALL: [Self; 5] = [
        Self::Client,
        Self::Prospect,
        Self::Caregiver,
        Self::ReferralPartner,
        Self::CarrierRepresentative,
    ];

    /// Fields collected for contacts holding this role.
    #[must_use]
    pub const fn fields(self) -> &'static [RoleField] {
        match self {
            Self::Client => CLIENT_FIELDS,
            Self::Prospect => PROSPECT_FIELDS,
            Self::Caregiver => CAREGIVER_FIELDS,
            Self::ReferralPartner => REFERRAL_PARTNER_FIELDS,
            Self::CarrierRepresentative => CARRIER_REPRESENTATIVE_FIELDS,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Prospect => "Prospect",
            Self::Caregiver => "Caregiver",
            Self::ReferralPartner => "Referral partner",
            Self::CarrierRepresentative => "Carrier representative",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Prospect => "prospect",
            Self::Caregiver => "caregiver",
            Self::ReferralPartner => "referral_partner",
            Self::CarrierRepresentative => "carrier_representative",
        }
    }
}

impl fmt::Display for ContactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "contact role",
                value: s.to_string(),
            })
    }
}
