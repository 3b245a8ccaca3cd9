// Resume analysis: upload intake, PDF text extraction, prompt assembly and the
// single completion call. All model calls go through llm_client.

pub mod extraction;
pub mod handlers;
pub mod prompts;
pub mod report;
pub mod upload;

#[cfg(test)]
pub mod test_support;
