use super::domain::ClaimSubmission;

/// Validation errors raised before any claim is created.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("policy number must be at least {min} characters")]
    PolicyNumberTooShort { min: usize },
    #[error("description must be between {min} and {max} characters")]
    DescriptionLength { min: usize, max: usize },
    #[error("claimant identifier is required")]
    MissingClaimant,
    #[error("at least one supporting document is required")]
    MissingDocuments,
    #[error("at most {max} supporting documents are accepted")]
    TooManyDocuments { max: usize },
}

const MIN_POLICY_NUMBER: usize = 5;
const MIN_DESCRIPTION: usize = 10;
const MAX_DESCRIPTION: usize = 2000;
const MAX_DOCUMENTS: usize = 5;

/// Reject malformed submissions up front so that invalid input never
/// reaches the scoring or workflow layers.
pub fn validate(submission: &ClaimSubmission) -> Result<(), IntakeError> {
    if submission.claimant_id.trim().is_empty() {
        return Err(IntakeError::MissingClaimant);
    }

    if submission.policy_number.trim().len() < MIN_POLICY_NUMBER {
        return Err(IntakeError::PolicyNumberTooShort {
            min: MIN_POLICY_NUMBER,
        });
    }

    let description = submission.description.trim();
    if description.len() < MIN_DESCRIPTION || description.len() > MAX_DESCRIPTION {
        return Err(IntakeError::DescriptionLength {
            min: MIN_DESCRIPTION,
            max: MAX_DESCRIPTION,
        });
    }

    if submission.documents.is_empty() {
        return Err(IntakeError::MissingDocuments);
    }
    if submission.documents.len() > MAX_DOCUMENTS {
        return Err(IntakeError::TooManyDocuments {
            max: MAX_DOCUMENTS,
        });
    }

    Ok(())
}
