//! Session data model and its persisted JSON shape.
//!
//! Stored as `{ "step": <1..6>, "data": { ... } }` under one storage key.

use {
    serde::{Deserialize, Serialize},
    voira_common::{PhoneNumbers, ScrapedData},
};

use crate::{
    field::Field,
    step::{InvalidStep, Step},
};

/// Answer of the Website step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteInfo {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_data: Option<ScrapedData>,
}

/// Answer of the Details step. All three fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetails {
    pub practice_name: String,
    pub business_type: String,
    pub location: String,
}

/// Outcome of the Knowledge step's document upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSummary {
    pub uploaded: usize,
    #[serde(default)]
    pub skipped: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

/// Provider picked on the Calendar or Email step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationChoice {
    pub provider: String,
}

impl IntegrationChoice {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }
}

/// Everything collected so far, one slot per step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingData {
    #[serde(skip_serializing_if = "Field::is_unset")]
    pub website: Field<WebsiteInfo>,
    #[serde(skip_serializing_if = "Field::is_unset")]
    pub details: Field<BusinessDetails>,
    #[serde(skip_serializing_if = "Field::is_unset")]
    pub knowledge: Field<KnowledgeSummary>,
    #[serde(skip_serializing_if = "Field::is_unset")]
    pub phone: Field<PhoneNumbers>,
    #[serde(skip_serializing_if = "Field::is_unset")]
    pub calendar: Field<IntegrationChoice>,
    #[serde(skip_serializing_if = "Field::is_unset")]
    pub email: Field<IntegrationChoice>,
}

/// Initial values shown by the Details view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsPrefill {
    pub practice_name: String,
    pub business_type: String,
    pub location: String,
}

impl OnboardingData {
    /// Scraped website data wins over previously entered details.
    pub fn details_prefill(&self) -> DetailsPrefill {
        if let Some(scraped) = self
            .website
            .provided()
            .and_then(|w| w.scraped_data.as_ref())
        {
            return DetailsPrefill {
                practice_name: scraped.practice_name.clone().unwrap_or_default(),
                business_type: scraped.business_type.clone().unwrap_or_default(),
                location: scraped.location.clone().unwrap_or_default(),
            };
        }
        match self.details.provided() {
            Some(d) => DetailsPrefill {
                practice_name: d.practice_name.clone(),
                business_type: d.business_type.clone(),
                location: d.location.clone(),
            },
            None => DetailsPrefill::default(),
        }
    }
}

/// Step pointer plus collected data; the unit of persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSession")]
pub struct OnboardingSession {
    pub step: Step,
    pub data: OnboardingData,
}

impl OnboardingSession {
    pub fn new(step: Step, data: OnboardingData) -> Self {
        Self { step, data }
    }
}

/// Lenient read shape: a missing, null or zero `step` means step 1 and a
/// missing or null `data` means no answers.
#[derive(Deserialize)]
struct StoredSession {
    #[serde(default)]
    step: Option<u8>,
    #[serde(default)]
    data: Option<OnboardingData>,
}

impl TryFrom<StoredSession> for OnboardingSession {
    type Error = InvalidStep;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        let step = match stored.step {
            None | Some(0) => Step::Website,
            Some(n) => Step::try_from(n)?,
        };
        Ok(Self {
            step,
            data: stored.data.unwrap_or_default(),
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn acme() -> BusinessDetails {
        BusinessDetails {
            practice_name: "Acme Vet".into(),
            business_type: "Veterinary Clinic".into(),
            location: "Austin, TX".into(),
        }
    }

    #[test]
    fn serializes_step_as_number_and_omits_unset_fields() {
        let session = OnboardingSession::new(Step::Knowledge, OnboardingData {
            website: Field::Skipped,
            details: Field::Provided(acme()),
            ..Default::default()
        });
        assert_eq!(
            serde_json::to_value(&session).unwrap(),
            json!({
                "step": 3,
                "data": {
                    "website": null,
                    "details": {
                        "practiceName": "Acme Vet",
                        "businessType": "Veterinary Clinic",
                        "location": "Austin, TX",
                    },
                },
            })
        );
    }

    #[test]
    fn reads_legacy_blob_without_knowledge_slot() {
        let blob = json!({
            "step": 5,
            "data": {
                "website": { "url": "https://medco.example", "scrapedData": { "practiceName": "Medco" } },
                "details": { "practiceName": "Medco", "businessType": "Dental Practice", "location": "Berlin" },
                "phone": { "inboundNumber": "+1 (555) 100-1000", "outboundNumber": "+1 (555) 200-2000" },
            },
        });
        let session: OnboardingSession = serde_json::from_value(blob).unwrap();
        assert_eq!(session.step, Step::Calendar);
        assert!(session.data.knowledge.is_unset());
        assert!(session.data.calendar.is_unset());
        assert_eq!(
            session.data.phone.provided().unwrap().outbound_number,
            "+1 (555) 200-2000"
        );
    }

    #[test]
    fn missing_or_zero_step_means_first_step() {
        let s: OnboardingSession = serde_json::from_value(json!({})).unwrap();
        assert_eq!(s, OnboardingSession::default());
        let s: OnboardingSession =
            serde_json::from_value(json!({ "step": 0, "data": null })).unwrap();
        assert_eq!(s, OnboardingSession::default());
    }

    #[test]
    fn out_of_range_step_is_an_error() {
        assert!(serde_json::from_value::<OnboardingSession>(json!({ "step": 7 })).is_err());
        assert!(serde_json::from_value::<OnboardingSession>(json!({ "step": -1 })).is_err());
    }

    #[test]
    fn prefill_prefers_scraped_data() {
        let mut data = OnboardingData {
            details: Field::Provided(acme()),
            ..Default::default()
        };
        assert_eq!(data.details_prefill().practice_name, "Acme Vet");

        data.website = Field::Provided(WebsiteInfo {
            url: "https://medco.example".into(),
            scraped_data: Some(ScrapedData {
                practice_name: Some("Medco".into()),
                location: Some("Berlin, Germany".into()),
                ..Default::default()
            }),
        });
        let prefill = data.details_prefill();
        assert_eq!(prefill.practice_name, "Medco");
        assert_eq!(prefill.business_type, "");
        assert_eq!(prefill.location, "Berlin, Germany");
    }
}
