//! Health-risk assessment (USEPA exposure model)
//!
//! Supplementary diagnostics alongside the pollution indices: chronic daily
//! intake, hazard quotients, and lifetime cancer risk, evaluated for adult
//! and child exposure scenarios.

use crate::standards::Metal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Exposure demographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Demographic {
    Adult,
    Child,
}

/// Exposure scenario parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureProfile {
    /// Body weight, kg.
    pub body_weight: f64,
    /// Ingestion rate, L/day.
    pub ingestion_rate: f64,
    /// Exposure frequency, days/year.
    pub exposure_frequency: f64,
    /// Exposure duration, years.
    pub exposure_duration: f64,
    /// Averaging time, days.
    pub averaging_time: f64,
}

impl ExposureProfile {
    /// USEPA default scenario for the demographic.
    pub fn for_demographic(demographic: Demographic) -> ExposureProfile {
        match demographic {
            Demographic::Adult => ExposureProfile {
                body_weight: 70.0,
                ingestion_rate: 2.2,
                exposure_frequency: 350.0,
                exposure_duration: 70.0,
                averaging_time: 25550.0,
            },
            Demographic::Child => ExposureProfile {
                body_weight: 15.0,
                ingestion_rate: 1.8,
                exposure_frequency: 350.0,
                exposure_duration: 6.0,
                averaging_time: 2190.0,
            },
        }
    }
}

/// Toxicity parameters for one metal (USEPA/IRIS).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxicityParams {
    /// Oral reference dose, mg/kg/day.
    pub reference_dose: f64,
    /// Cancer slope factor, (mg/kg/day)^-1; None for non-carcinogens.
    pub slope_factor: Option<f64>,
}

/// Published USEPA/IRIS toxicity parameters for a metal.
pub fn toxicity_params(metal: Metal) -> ToxicityParams {
    let (rfd, csf) = match metal {
        Metal::Arsenic => (0.0003, Some(1.5)),
        Metal::Cadmium => (0.0005, Some(6.3)),
        Metal::Chromium => (0.003, Some(0.5)),
        Metal::Copper => (0.04, None),
        Metal::Iron => (0.7, None),
        Metal::Lead => (0.0014, Some(0.0085)),
        Metal::Manganese => (0.024, None),
        Metal::Mercury => (0.0003, None),
        Metal::Nickel => (0.02, None),
        Metal::Zinc => (0.3, None),
    };
    ToxicityParams {
        reference_dose: rfd,
        slope_factor: csf,
    }
}

/// Chronic Daily Intake: CDI = (C * IR * EF * ED) / (BW * AT).
pub fn chronic_daily_intake(concentration: f64, profile: &ExposureProfile) -> f64 {
    let numerator = concentration
        * profile.ingestion_rate
        * profile.exposure_frequency
        * profile.exposure_duration;
    let denominator = profile.body_weight * profile.averaging_time;
    numerator / denominator
}

/// Hazard Quotient: HQ = CDI / RfD.
pub fn hazard_quotient(cdi: f64, reference_dose: f64) -> f64 {
    cdi / reference_dose
}

/// Aggregate health risk for one demographic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthRisk {
    /// Hazard Index: sum of per-metal hazard quotients. Values above 1.0
    /// indicate non-carcinogenic risk.
    pub hazard_index: f64,
    /// Lifetime cancer risk: sum of CDI * CSF over carcinogens.
    pub cancer_risk: f64,
}

/// Assess aggregate health risk for a set of concentrations (mg/L).
pub fn assess(
    concentrations: &BTreeMap<Metal, f64>,
    demographic: Demographic,
) -> HealthRisk {
    let profile = ExposureProfile::for_demographic(demographic);
    let mut hazard_index = 0.0;
    let mut cancer_risk = 0.0;

    for (metal, conc) in concentrations {
        let params = toxicity_params(*metal);
        let cdi = chronic_daily_intake(*conc, &profile);
        hazard_index += hazard_quotient(cdi, params.reference_dose);
        if let Some(csf) = params.slope_factor {
            cancer_risk += cdi * csf;
        }
    }

    HealthRisk {
        hazard_index,
        cancer_risk,
    }
}
