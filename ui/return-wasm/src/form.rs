use web_sys::HtmlInputElement;
use wslp_return_core::ReturnForm;
use wslp_types::SubmissionInput;

use crate::dom::{self, Elements};

/// The three form inputs as the controller's form surface.
pub struct DomForm {
    source_token: HtmlInputElement,
    amount: HtmlInputElement,
    destination: HtmlInputElement,
}

impl DomForm {
    pub fn new(els: &Elements) -> Self {
        Self {
            source_token: els.token_input.clone(),
            amount: els.amount_input.clone(),
            destination: els.destination_input.clone(),
        }
    }
}

impl ReturnForm for DomForm {
    fn snapshot(&self) -> SubmissionInput {
        SubmissionInput {
            source_token_address: dom::get_input_value(&self.source_token),
            amount: dom::get_input_value(&self.amount),
            destination_address: dom::get_input_value(&self.destination),
        }
    }

    fn reset(&self) {
        for input in [&self.source_token, &self.amount, &self.destination] {
            dom::set_input_value(input, "");
        }
    }
}
