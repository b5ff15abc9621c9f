//! OCR prompt constants and request body.
//!
//! These prompts are the contract with the vision model: complete question
//! text, readable operators, LaTeX only in balanced delimiters.

pub const DEFAULT_BASE_URL: &str = "https://apis.iflow.cn/v1";
pub const DEFAULT_MODEL: &str = "Qwen3-VL-Plus";
pub const OCR_MAX_TOKENS: u32 = 800;
pub const OCR_TEMPERATURE: f64 = 0.2;

/// System prompt: transcribe the question, nothing else.
pub const OCR_SYSTEM_PROMPT: &str = r#"You are an OCR and question-structuring assistant. Reproduce the question in the image as completely as possible, keeping line breaks, numbering, options and sub-questions.

<rules>
1. Prefer directly readable math symbols (× ÷ ≤ ≥). Do not write \times.
2. Use LaTeX only for complex formulas (fractions, roots, sub/superscripts), and always in balanced $...$ or $$...$$ pairs.
3. If the question contains a geometry figure, function graph, chart, diagram or table, first extract the visible text and labels, then describe the relationships (points, lines, angles, parallel/perpendicular, side lengths, coordinates, units, headers and data).
4. Figure information you cannot transcribe directly goes on its own lines prefixed with "Figure info:".
5. Output only the question content. No explanations.
</rules>"#;

/// User turn that accompanies the image.
pub const OCR_USER_PROMPT: &str = "Recognize this question image completely. Check the operator in every option carefully: restore x, * and · used as multiplication to ×. Do not drop units, brackets, separators or decimal points. If there is a diagram, geometry figure, graph or table, include its key information too.";

/// OpenAI-compatible chat completion body for one OCR request.
pub fn build_ocr_request(model: &str, image_data_url: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "stream": false,
        "temperature": OCR_TEMPERATURE,
        "max_tokens": OCR_MAX_TOKENS,
        "messages": [
            {
                "role": "system",
                "content": OCR_SYSTEM_PROMPT,
            },
            {
                "role": "user",
                "content": [
                    { "type": "text", "text": OCR_USER_PROMPT },
                    { "type": "image_url", "image_url": { "url": image_data_url } }
                ]
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_image_and_limits() {
        let body = build_ocr_request("test-model", "data:image/jpeg;base64,AAAA");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 800);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(
            body["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }
}
