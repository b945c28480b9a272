//! Default question set, used when no bank is configured or loading fails.

use crate::question::Question;

#[allow(clippy::too_many_arguments)]
fn q(
    id: &str,
    prompt: &str,
    scenario: Option<&str>,
    options: [&str; 4],
    correct_index: usize,
    category: &str,
    difficulty: u32,
    explanation: &str,
) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        scenario: scenario.map(str::to_string),
        options: options.map(str::to_string),
        correct_index,
        category: category.to_string(),
        difficulty,
        explanation: Some(explanation.to_string()),
    }
}

pub fn builtin_questions() -> Vec<Question> {
    vec![
        q(
            "cs_1",
            "What is the BEST first step?",
            Some("A customer reports that their order arrived with the wrong item and they need it by tomorrow."),
            [
                "Issue a refund before looking at the order.",
                "Apologize and confirm the order details with them.",
                "Ask them to send the item back before anything else.",
                "Hand the call to a supervisor immediately.",
            ],
            1,
            "Customer Service",
            1,
            "Confirming the details first shows you take the problem seriously and tells you what actually went wrong.",
        ),
        q(
            "cs_2",
            "What is the BEST approach?",
            Some("A customer in a hurry asks about a product feature you are not sure about."),
            [
                "Give your best guess so they are not kept waiting.",
                "Offer to confirm the answer and follow up with accurate information.",
                "Tell them to look it up on the website.",
                "Transfer them until someone knows.",
            ],
            1,
            "Customer Service",
            1,
            "Accurate information delivered a little later builds more trust than a fast wrong answer.",
        ),
        q(
            "math_1",
            "What is 15 + 27?",
            None,
            ["41", "42", "43", "44"],
            1,
            "Mathematics",
            1,
            "15 + 27 = 42",
        ),
        q(
            "math_2",
            "What is 12 x 8?",
            None,
            ["86", "94", "96", "104"],
            2,
            "Mathematics",
            2,
            "12 x 8 = 96",
        ),
        q(
            "cs_3",
            "What should you do FIRST?",
            Some("While you are helping one customer, another approaches with a complaint."),
            [
                "Ignore the second customer until you are finished.",
                "Acknowledge them and say you will be with them shortly.",
                "Drop the current customer to handle the complaint.",
                "Point them at another employee without a word.",
            ],
            1,
            "Customer Service",
            2,
            "A quick acknowledgement manages expectations without abandoning the person you are already helping.",
        ),
        q(
            "safety_1",
            "A coworker leaves a spill on the floor of a busy aisle. What do you do?",
            None,
            [
                "Walk around it, it is not your area.",
                "Mark or guard the spill and arrange for it to be cleaned.",
                "Wait for a manager to notice.",
                "Mention it at the end of your shift.",
            ],
            1,
            "Safety",
            2,
            "Hazards are everyone's responsibility; make the area safe right away.",
        ),
        q(
            "cs_4",
            "What is the BEST response?",
            Some("A customer insists on an advertised discount from a promotion that has already ended."),
            [
                "Say there is nothing you can do.",
                "Acknowledge the frustration, explain the promotion dates and check for current offers.",
                "Apply the expired discount anyway.",
                "Suggest they shop somewhere else.",
            ],
            1,
            "Customer Service",
            3,
            "Empathy plus a clear explanation and an alternative keeps the relationship intact without breaking policy.",
        ),
        q(
            "math_3",
            "A shirt costs 40 and is discounted by 25%. What is the sale price?",
            None,
            ["10", "25", "30", "35"],
            2,
            "Mathematics",
            3,
            "25% of 40 is 10, so the sale price is 30.",
        ),
    ]
}
