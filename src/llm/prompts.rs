//! Prompt text and response schema for refusal generation.

use crate::models::{GenerationRequest, Language, Tone, CANDIDATES_PER_RESULT};
use serde_json::{json, Value};

const CONTEXT_BLOCK: &str = r#"CONTEXT:
- You are a communication expert specializing in polite but clear refusal.
- Your goal is to generate 4 refusal messages in 4 different tones: {tones}.
- The output must be in the language specified: {language}.
- The tone must be extremely conversational and natural for personal situations (Polite, Direct, Witty), and professional for business contexts. Avoid any stiff or robotic language."#;

const EXAMPLES_BLOCK: &str = r#"GOOD EXAMPLES (in Korean for personal context):
- "자기야, 오늘은 너무 피곤해서 못 만날 것 같아. 내일 꼭 보자 ❤️"
- "미안, 오늘 약속은 못 갈 것 같아. 담에 꼭 보자."
- "고맙긴 한데 오늘은 집에 있고 싶어. 이해 좀 해줘."

GOOD EXAMPLES (in Korean for business context):
- "팀장님, 죄송하지만 주말 근무는 어려울 것 같습니다. 미리 계획된 개인 일정이 있습니다."
- "제안은 감사하지만, 현재 저희 팀의 우선순위와는 맞지 않는 것 같습니다.""#;

const TASK_BLOCK: &str = r#"TASK:
- Situation: "{situation}"
- My preferred primary tone: "{tone}"
- Language for response: "{language}"

Generate 4 refusal messages ({tones}) for this situation in {language}.
Also provide a 'score' from 0-100 for how gentle the refusal is. The score for the 'Business' tone should reflect its professionalism and appropriateness in a work setting.
Respond ONLY with the JSON object defined in the schema."#;

const SYSTEM_INSTRUCTION: &str = "당신은 상대방의 기분을 상하지 않게 거절하는 법을 알려주는 커뮤니케이션 전문가입니다. 사용자가 선택한 언어({language})로 상황에 맞는 자연스러운 말투로 거절 문구를 생성합니다. 개인적인 상황에서는 부드러운 구어체를, 업무적인 상황에서는 정중하고 프로페셔널한 어조를 사용해주세요. 딱딱하거나 AI 같은 말투는 피해주세요.";

/// User-turn prompt for one request.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let language = request.language.name();
    let tones = Tone::ALL
        .iter()
        .map(Tone::english_name)
        .collect::<Vec<_>>()
        .join(", ");
    let context = CONTEXT_BLOCK
        .replace("{tones}", &tones)
        .replace("{language}", language);
    // Situation goes in last so user text is never treated as a placeholder.
    let task = TASK_BLOCK
        .replace("{tones}", &tones)
        .replace("{tone}", request.tone.label())
        .replace("{language}", language)
        .replace("{situation}", request.situation.trim());
    format!("{}\n\n{}\n\n{}", context, EXAMPLES_BLOCK, task)
}

pub fn system_instruction(language: Language) -> String {
    SYSTEM_INSTRUCTION.replace("{language}", language.name())
}

/// Structured-output schema in the Gemini `Schema` dialect.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "refusals": {
                "type": "ARRAY",
                "description": "생성된 4개의 거절 문구 배열",
                "minItems": CANDIDATES_PER_RESULT,
                "maxItems": CANDIDATES_PER_RESULT,
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "tone": {
                            "type": "STRING",
                            "description": "거절 문구의 톤 (예: 정중하게, 단호하게, 재치있게, 업무적으로)"
                        },
                        "text": {
                            "type": "STRING",
                            "description": "생성된 거절 문구"
                        },
                        "score": {
                            "type": "INTEGER",
                            "description": "상처 없는 거절 점수 (0-100)"
                        }
                    },
                    "required": ["tone", "text", "score"]
                }
            }
        },
        "required": ["refusals"]
    })
}
