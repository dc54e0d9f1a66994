//! Request/response contract consumed by the presentation layer

use crate::error::FeedbackError;
use crate::orchestrator::{FeedbackOrchestrator, ResolveRequest};
use feedback_scenario::{
    BlockPerformance, FeedbackPatternSet, ParticipantId, ParticipantProfile, ScenarioKey,
    ValidationError,
};
use serde::{Deserialize, Serialize};

/// Incoming feedback request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Participant profile; `id` may be absent on first contact
    pub participant_info: ParticipantProfile,
    /// Block just completed
    pub block_data: BlockData,
    /// Bypass the cache
    #[serde(default)]
    pub force: bool,
}

/// Unvalidated summary of the current block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockData {
    /// 1-based block index
    pub block_number: u32,
    /// Percent correct
    pub accuracy: f64,
    /// Mean reaction time in milliseconds
    #[serde(rename = "averageRT")]
    pub average_rt: f64,
    /// Block before this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_block: Option<PreviousBlock>,
}

/// Unvalidated summary of the previous block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousBlock {
    /// Defaults to the current block number minus one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u32>,
    /// Percent correct
    pub accuracy: f64,
    /// Mean reaction time in milliseconds
    #[serde(rename = "averageRT")]
    pub average_rt: f64,
}

/// Outgoing feedback response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    /// Complete pattern set for the participant
    pub feedback_patterns: FeedbackPatternSet,
    /// Default set served because generation failed
    pub fallback: bool,
    /// Served from the store
    pub cached: bool,
    /// Resolved participant id
    pub participant_id: ParticipantId,
    /// Scenario of the supplied blocks
    pub scenario: ScenarioKey,
    /// Message selected for the current block
    pub message: String,
}

impl BlockData {
    /// Validated current and previous blocks
    ///
    /// # Errors
    /// `ValidationError` for a zero block number, accuracy outside
    /// `[0, 100]` or a non-positive reaction time.
    pub fn validate(&self) -> Result<(BlockPerformance, Option<BlockPerformance>), ValidationError> {
        let current = BlockPerformance::new(self.block_number, self.accuracy, self.average_rt)?;
        let previous = self
            .previous_block
            .as_ref()
            .map(|prev| {
                let number = prev
                    .block_number
                    .unwrap_or_else(|| self.block_number.saturating_sub(1).max(1));
                BlockPerformance::new(number, prev.accuracy, prev.average_rt)
            })
            .transpose()?;
        Ok((current, previous))
    }
}

impl FeedbackRequest {
    /// Typed orchestrator request
    ///
    /// # Errors
    /// `ValidationError` if the block data is invalid
    pub fn validate(&self) -> Result<ResolveRequest, ValidationError> {
        self.clone().into_resolve_request()
    }

    /// Consume into a typed orchestrator request
    ///
    /// # Errors
    /// `ValidationError` if the block data is invalid
    pub fn into_resolve_request(self) -> Result<ResolveRequest, ValidationError> {
        let (current_block, previous_block) = self.block_data.validate()?;
        Ok(ResolveRequest {
            participant_id: self.participant_info.id.clone(),
            profile: self.participant_info,
            current_block,
            previous_block,
            force: self.force,
        })
    }
}

impl FeedbackOrchestrator {
    /// Handle one request end to end
    ///
    /// Resolves the pattern set and selects the message for the current block.
    ///
    /// # Errors
    /// - `FeedbackError::Validation` for invalid block data
    /// - `FeedbackError::Store` if the store fails
    pub async fn respond(&self, request: FeedbackRequest) -> Result<FeedbackResponse, FeedbackError> {
        let language = request.participant_info.language;
        let resolve = request.into_resolve_request()?;
        let current = resolve.current_block;
        let previous = resolve.previous_block;

        let resolution = self.resolve(resolve).await?;
        let message = self
            .selector()
            .with_language(language)
            .select(&current, previous.as_ref(), &resolution.pattern_set);

        Ok(FeedbackResponse {
            feedback_patterns: resolution.pattern_set,
            fallback: resolution.fallback,
            cached: resolution.cached,
            participant_id: resolution.participant_id,
            scenario: resolution.scenario,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> FeedbackRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_wire_request() {
        let request = parse(json!({
            "participantInfo": {
                "id": "p-42",
                "nickname": "Mika",
                "preferredPraise": ["effort"],
                "tonePreference": "casual",
                "motivationStyle": "cheerleader",
                "evaluationFocus": "self-progress",
                "language": "en"
            },
            "blockData": {
                "blockNumber": 3,
                "accuracy": 86.0,
                "averageRT": 640.0,
                "previousBlock": { "accuracy": 80.0, "averageRT": 710.0 }
            }
        }));

        assert!(!request.force);
        let resolve = request.validate().unwrap();
        assert_eq!(resolve.participant_id, Some(ParticipantId::new("p-42")));
        assert_eq!(resolve.current_block.block_number(), 3);
        assert_eq!(resolve.previous_block.unwrap().block_number(), 2);
    }

    #[test]
    fn previous_block_number_floors_at_one() {
        let data = BlockData {
            block_number: 1,
            accuracy: 80.0,
            average_rt: 600.0,
            previous_block: Some(PreviousBlock {
                block_number: None,
                accuracy: 70.0,
                average_rt: 650.0,
            }),
        };
        let (_, previous) = data.validate().unwrap();
        assert_eq!(previous.unwrap().block_number(), 1);
    }

    #[test]
    fn rejects_invalid_block_data() {
        let request = parse(json!({
            "participantInfo": { "nickname": "Mika" },
            "blockData": { "blockNumber": 2, "accuracy": 140.0, "averageRT": 600.0 }
        }));
        assert_eq!(
            request.validate().unwrap_err(),
            ValidationError::AccuracyOutOfRange(140.0)
        );
    }

    #[test]
    fn rejects_invalid_previous_block() {
        let request = parse(json!({
            "participantInfo": { "nickname": "Mika" },
            "blockData": {
                "blockNumber": 2,
                "accuracy": 80.0,
                "averageRT": 600.0,
                "previousBlock": { "accuracy": 80.0, "averageRT": -1.0 }
            }
        }));
        assert!(matches!(
            request.validate(),
            Err(ValidationError::NonPositiveReactionTime(_))
        ));
    }

    #[test]
    fn missing_block_data_fails_to_parse() {
        let result: Result<FeedbackRequest, _> =
            serde_json::from_value(json!({ "participantInfo": { "nickname": "Mika" } }));
        assert!(result.is_err());
    }

    #[test]
    fn response_uses_wire_names() {
        let response = FeedbackResponse {
            feedback_patterns: FeedbackPatternSet::new(),
            fallback: true,
            cached: false,
            participant_id: ParticipantId::new("p-1"),
            scenario: ScenarioKey::RtSameAccSame,
            message: "hi".into(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["participantId"], "p-1");
        assert_eq!(value["scenario"], "rt_same_acc_same");
        assert_eq!(value["fallback"], true);
        assert!(value["feedbackPatterns"].is_object());
    }
}
