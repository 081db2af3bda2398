// src/validation.rs
use chrono::NaiveDate;

use crate::error::IntakeError;
use crate::models::{
    CandidatePayload, EducationPayload, NewCandidate, NewEducation, NewResume, NewWorkExperience,
    ResumePayload, WorkExperiencePayload,
};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const ADDRESS_MAX: usize = 100;
const INSTITUTION_MAX: usize = 100;
const TITLE_MAX: usize = 250;
const COMPANY_MAX: usize = 100;
const POSITION_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 200;
const DATE_FORMAT: &str = "%Y-%m-%d";

const ACCEPTED_RESUME_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Check a candidate payload against the intake field rules and produce the
/// typed candidate the store persists.
///
/// Rules run in a fixed order and the first violation wins, so error
/// precedence is deterministic: names, email, phone, address, then each
/// education entry, each work experience entry, and the resume. Pure, no
/// side effects.
pub fn validate(payload: &CandidatePayload) -> Result<NewCandidate, IntakeError> {
    let first_name = require_name(payload.first_name.as_deref())?;
    let last_name = require_name(payload.last_name.as_deref())?;
    let email = require_email(payload.email.as_deref())?;

    let phone = match payload.phone.as_deref() {
        Some(phone) => Some(require_phone(phone)?),
        None => None,
    };

    let address = match payload.address.as_deref() {
        Some(address) => {
            if address.chars().count() > ADDRESS_MAX {
                return Err(IntakeError::Validation("Invalid address"));
            }
            Some(address.to_string())
        }
        None => None,
    };

    let educations = payload
        .educations
        .iter()
        .map(validate_education)
        .collect::<Result<Vec<_>, _>>()?;

    let work_experiences = payload
        .work_experiences
        .iter()
        .map(validate_work_experience)
        .collect::<Result<Vec<_>, _>>()?;

    let resume = match &payload.cv {
        Some(cv) => Some(validate_resume(cv)?),
        None => None,
    };

    Ok(NewCandidate {
        first_name,
        last_name,
        email,
        phone,
        address,
        educations,
        work_experiences,
        resume,
    })
}

fn require_name(value: Option<&str>) -> Result<String, IntakeError> {
    let name = value.ok_or(IntakeError::Validation("Invalid name"))?;
    let length = name.chars().count();
    let letters_and_spaces = name.chars().all(|c| c.is_alphabetic() || c == ' ');
    let has_letter = name.chars().any(char::is_alphabetic);
    if length < NAME_MIN || length > NAME_MAX || !letters_and_spaces || !has_letter {
        return Err(IntakeError::Validation("Invalid name"));
    }
    Ok(name.to_string())
}

fn require_email(value: Option<&str>) -> Result<String, IntakeError> {
    let email = value.ok_or(IntakeError::Validation("Invalid email"))?;
    if !is_valid_email(email) {
        return Err(IntakeError::Validation("Invalid email"));
    }
    Ok(email.to_string())
}

/// `local@domain.tld` shape: one `@`, non-empty local part, dotted domain
/// with non-empty labels, no whitespace anywhere.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

/// National mobile format: nine digits, first one 6, 7 or 9.
fn require_phone(phone: &str) -> Result<String, IntakeError> {
    let bytes = phone.as_bytes();
    let valid = bytes.len() == 9
        && matches!(bytes[0], b'6' | b'7' | b'9')
        && bytes.iter().all(u8::is_ascii_digit);
    if !valid {
        return Err(IntakeError::Validation("Invalid phone"));
    }
    Ok(phone.to_string())
}

fn validate_education(entry: &EducationPayload) -> Result<NewEducation, IntakeError> {
    let institution = require_text(
        entry.institution.as_deref(),
        INSTITUTION_MAX,
        "Invalid education",
    )?;
    let title = require_text(entry.title.as_deref(), TITLE_MAX, "Invalid education")?;
    let (start_date, end_date) =
        require_date_range(entry.start_date.as_deref(), entry.end_date.as_deref())?;

    Ok(NewEducation {
        institution,
        title,
        start_date,
        end_date,
    })
}

fn validate_work_experience(entry: &WorkExperiencePayload) -> Result<NewWorkExperience, IntakeError> {
    let company = require_text(entry.company.as_deref(), COMPANY_MAX, "Invalid work experience")?;
    let position = require_text(
        entry.position.as_deref(),
        POSITION_MAX,
        "Invalid work experience",
    )?;
    let description = match entry.description.as_deref() {
        Some(description) => {
            if description.chars().count() > DESCRIPTION_MAX {
                return Err(IntakeError::Validation("Invalid work experience"));
            }
            Some(description.to_string())
        }
        None => None,
    };
    let (start_date, end_date) =
        require_date_range(entry.start_date.as_deref(), entry.end_date.as_deref())?;

    Ok(NewWorkExperience {
        company,
        position,
        description,
        start_date,
        end_date,
    })
}

fn validate_resume(cv: &ResumePayload) -> Result<NewResume, IntakeError> {
    let file_path = cv
        .file_path
        .as_deref()
        .filter(|path| !path.is_empty())
        .ok_or(IntakeError::Validation("Invalid resume"))?;
    let file_type = cv
        .file_type
        .as_deref()
        .filter(|kind| ACCEPTED_RESUME_TYPES.contains(kind))
        .ok_or(IntakeError::Validation("Invalid resume"))?;

    Ok(NewResume {
        file_path: file_path.to_string(),
        file_type: file_type.to_string(),
    })
}

fn require_text(
    value: Option<&str>,
    max: usize,
    message: &'static str,
) -> Result<String, IntakeError> {
    match value {
        Some(text) if !text.is_empty() && text.chars().count() <= max => Ok(text.to_string()),
        _ => Err(IntakeError::Validation(message)),
    }
}

fn require_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(NaiveDate, Option<NaiveDate>), IntakeError> {
    let start = start.ok_or(IntakeError::Validation("Invalid date"))?;
    let start_date = NaiveDate::parse_from_str(start, DATE_FORMAT)
        .map_err(|_| IntakeError::Validation("Invalid date"))?;

    let end_date = match end {
        Some(end) => {
            let end_date = NaiveDate::parse_from_str(end, DATE_FORMAT)
                .map_err(|_| IntakeError::Validation("Invalid end date"))?;
            if end_date < start_date {
                return Err(IntakeError::Validation("Invalid end date"));
            }
            Some(end_date)
        }
        None => None,
    };

    Ok((start_date, end_date))
}
