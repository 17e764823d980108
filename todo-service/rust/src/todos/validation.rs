use super::domain::TodoParams;

pub(crate) const MAX_DESCRIPTION_LEN: usize = 255;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub(crate) enum ValidationError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("description must be at most 255 bytes long, got {0}")]
    DescriptionTooLong(usize),
    #[error("description must only contain printable ascii characters")]
    DescriptionNotAscii,
}

/// Checks decoded payloads before they reach the store.
#[derive(Clone, Copy, Default, Debug)]
pub(crate) struct Validator;

impl Validator {
    pub(crate) fn validate(&self, params: &TodoParams) -> Result<(), ValidationError> {
        let description = params.description.as_bytes();

        match description.len() {
            0 => return Err(ValidationError::EmptyDescription),
            n if n > MAX_DESCRIPTION_LEN => return Err(ValidationError::DescriptionTooLong(n)),
            _ => {}
        }

        if !description.iter().all(|b| matches!(b, b' '..=b'~')) {
            return Err(ValidationError::DescriptionNotAscii);
        }

        Ok(())
    }
}
