//! Mask hand-off descriptor for the image generation service.
//!
//! Only the shape of the data is modelled here; transport, storage and
//! authentication belong to the caller.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MaskType {
    /// Let the service derive the mask from the garment class
    #[default]
    Garment,
    /// Use an uploaded mask image
    Image,
    /// Let the service derive the mask from a text prompt
    Prompt,
}

impl MaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskType::Garment => "GARMENT",
            MaskType::Image => "IMAGE",
            MaskType::Prompt => "PROMPT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("mask_image_object_name is required when mask_type is IMAGE")]
    MissingMaskImage,
    #[error("mask_prompt is required when mask_type is PROMPT")]
    MissingMaskPrompt,
}

/// How the generation request selects its mask
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskRequest {
    pub mask_type: MaskType,
    pub mask_image_object_name: Option<String>,
    pub mask_prompt: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

impl MaskRequest {
    /// Request pointing at an uploaded mask image
    pub fn image(object_name: impl Into<String>) -> Self {
        Self {
            mask_type: MaskType::Image,
            mask_image_object_name: Some(object_name.into()),
            mask_prompt: None,
        }
    }

    /// Check that the fields required by `mask_type` are present
    pub fn validate(&self) -> Result<(), RequestError> {
        match self.mask_type {
            MaskType::Image if is_blank(&self.mask_image_object_name) => {
                Err(RequestError::MissingMaskImage)
            }
            MaskType::Prompt if is_blank(&self.mask_prompt) => Err(RequestError::MissingMaskPrompt),
            _ => Ok(()),
        }
    }

    /// A non-blank prompt always wins over the declared type
    pub fn effective_mask_type(&self) -> MaskType {
        if is_blank(&self.mask_prompt) {
            self.mask_type
        } else {
            MaskType::Prompt
        }
    }
}

/// Storage key for an uploaded mask: `{group}/{user}/vto/{date}/{uid}/mask_image.png`
pub fn mask_object_name(group_id: &str, user_id: &str, date_folder: &str, uid: &str) -> String {
    format!("{group_id}/{user_id}/vto/{date_folder}/{uid}/mask_image.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_type_requires_object_name() {
        let request = MaskRequest {
            mask_type: MaskType::Image,
            mask_image_object_name: Some("   ".to_string()),
            mask_prompt: None,
        };
        assert_eq!(request.validate(), Err(RequestError::MissingMaskImage));
        assert!(MaskRequest::image("a/b/mask.png").validate().is_ok());
    }

    #[test]
    fn test_prompt_type_requires_prompt() {
        let request = MaskRequest {
            mask_type: MaskType::Prompt,
            ..Default::default()
        };
        assert_eq!(request.validate(), Err(RequestError::MissingMaskPrompt));
    }

    #[test]
    fn test_prompt_overrides_declared_type() {
        let request = MaskRequest {
            mask_type: MaskType::Garment,
            mask_image_object_name: None,
            mask_prompt: Some("sleeves".to_string()),
        };
        assert_eq!(request.effective_mask_type(), MaskType::Prompt);
        assert_eq!(MaskRequest::default().effective_mask_type(), MaskType::Garment);
    }

    #[test]
    fn test_object_name_layout() {
        assert_eq!(
            mask_object_name("g", "u", "2024-01-01", "abc"),
            "g/u/vto/2024-01-01/abc/mask_image.png"
        );
    }
}
