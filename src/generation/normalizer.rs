//! Maps client requests onto the single provider call shape.
//!
//! Every function here is pure. Validation happens before anything is
//! built, and the image list is never padded, truncated or reordered.

use super::{GenerationRequest, InputImage, Operation, ProviderCall, ValidationError};

pub const RESTORE_INSTRUCTION: &str = "Restore and repair this photograph. Remove scratches, \
noise, stains and fading while preserving authentic detail, texture and historical integrity.";

pub const TRY_ON_INSTRUCTION: &str = "Show the person from the first image wearing the garment \
from the second image. Keep anatomy, fabric behavior and lighting realistic.";

pub fn normalize(request: &GenerationRequest) -> Result<ProviderCall, ValidationError> {
    match request.operation {
        Operation::Generate => generate(request),
        Operation::Edit => edit(request),
        Operation::TryOn => try_on(request),
        Operation::Restore => restore(request),
    }
}

pub fn generate(request: &GenerationRequest) -> Result<ProviderCall, ValidationError> {
    validate(request, Operation::Generate)?;
    Ok(ProviderCall {
        prompt: request.prompt.clone(),
        images: Vec::new(),
    })
}

pub fn edit(request: &GenerationRequest) -> Result<ProviderCall, ValidationError> {
    validate(request, Operation::Edit)?;
    Ok(ProviderCall {
        prompt: request.prompt.clone(),
        images: vec![request.images[0].clone()],
    })
}

pub fn restore(request: &GenerationRequest) -> Result<ProviderCall, ValidationError> {
    validate(request, Operation::Restore)?;
    Ok(ProviderCall {
        prompt: augment(&request.prompt, RESTORE_INSTRUCTION),
        images: vec![request.images[0].clone()],
    })
}

/// Subject first, garment second.
pub fn try_on(request: &GenerationRequest) -> Result<ProviderCall, ValidationError> {
    validate(request, Operation::TryOn)?;
    Ok(ProviderCall {
        prompt: augment(&request.prompt, TRY_ON_INSTRUCTION),
        images: vec![request.images[0].clone(), request.images[1].clone()],
    })
}

/// Fixed instruction first, then the user's text if there is any.
pub fn augment(user_prompt: &str, instruction: &str) -> String {
    let user_prompt = user_prompt.trim();
    if user_prompt.is_empty() {
        instruction.to_string()
    } else {
        format!("{} {}", instruction, user_prompt)
    }
}

fn validate(request: &GenerationRequest, operation: Operation) -> Result<(), ValidationError> {
    if request.operation != operation {
        return Err(ValidationError::malformed(format!(
            "{} request routed to {} normalizer",
            request.operation, operation
        )));
    }

    check_image_count(operation, &request.images)?;

    if request.api_key.is_empty() {
        return Err(ValidationError::malformed("API key is required"));
    }

    if !request.api_key.is_header_safe() {
        return Err(ValidationError::malformed(
            "API key contains invalid characters",
        ));
    }

    if operation.requires_prompt() && request.prompt.trim().is_empty() {
        return Err(ValidationError::malformed(format!(
            "prompt is required for {}",
            operation
        )));
    }

    Ok(())
}

pub fn check_image_count(
    operation: Operation,
    images: &[InputImage],
) -> Result<(), ValidationError> {
    let expected = operation.required_images();
    if images.len() != expected {
        return Err(ValidationError::WrongImageCount {
            operation,
            expected,
            actual: images.len(),
        });
    }
    Ok(())
}
