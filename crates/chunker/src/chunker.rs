use std::mem;

use deckshred_model::SlideRecord;

use crate::config::{ChunkerConfig, ChunkingStrategy};
use crate::tokens::{CharTokenEstimator, TokenEstimator};

/// A contiguous run of slides destined to become one output chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideGroup {
    /// Working title assigned by the strategy ("Introduction", the
    /// module-start slide's title, "Module N (Continued)", "Section N").
    pub title: String,
    pub slides: Vec<SlideRecord>,
}

impl SlideGroup {
    /// Inclusive (first, last) slide numbers covered by this group.
    #[must_use]
    pub fn slide_range(&self) -> (u32, u32) {
        let first = self.slides.first().map_or(0, |s| s.slide_number);
        let last = self.slides.last().map_or(0, |s| s.slide_number);
        (first, last)
    }
}

/// Groups annotated slides into module-sized chunks.
pub struct ModuleChunker {
    config: ChunkerConfig,
    estimator: Box<dyn TokenEstimator>,
}

impl ModuleChunker {
    /// Create a chunker with the default character-ratio estimator.
    #[must_use]
    pub fn new(config: ChunkerConfig) -> Self {
        Self::with_estimator(config, Box::new(CharTokenEstimator))
    }

    /// Create a chunker with an explicit token estimator.
    #[must_use]
    pub fn with_estimator(config: ChunkerConfig, estimator: Box<dyn TokenEstimator>) -> Self {
        config
            .validate()
            .expect("Invalid chunker configuration provided");
        Self { config, estimator }
    }

    /// Get configuration.
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Partition slides into ordered, contiguous, non-empty groups.
    ///
    /// Every slide lands in exactly one group; an empty input produces an
    /// empty output. A single slide over the token budget is never split
    /// and becomes its own group.
    #[must_use]
    pub fn chunk(&self, slides: Vec<SlideRecord>) -> Vec<SlideGroup> {
        match self.config.strategy {
            ChunkingStrategy::Instructional => self.chunk_instructional(slides),
            ChunkingStrategy::ModuleBased => self.chunk_by_modules(slides),
            ChunkingStrategy::Sequential => self.chunk_sequential(slides),
        }
    }

    /// Module boundaries plus token-budget early breaks.
    fn chunk_instructional(&self, slides: Vec<SlideRecord>) -> Vec<SlideGroup> {
        let mut groups = Vec::new();
        let mut current: Vec<SlideRecord> = Vec::new();
        let mut title = String::from("Introduction");
        let mut counter = 1usize;

        for slide in slides {
            if slide.is_module_start && !current.is_empty() {
                let next_title = slide
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("Module {}", counter + 1));
                groups.push(SlideGroup {
                    title: mem::replace(&mut title, next_title),
                    slides: mem::take(&mut current),
                });
                counter += 1;
                current.push(slide);
            } else {
                current.push(slide);

                if self.estimator.estimate_group(&current) > self.config.max_chunk_tokens {
                    let break_point = find_break_point(&current);
                    log::debug!(
                        "group over budget at {} slides, breaking at {break_point}",
                        current.len()
                    );

                    let rest = current.split_off(break_point);
                    let next_title = format!("Module {} (Continued)", counter + 1);
                    groups.push(SlideGroup {
                        title: mem::replace(&mut title, next_title),
                        slides: mem::replace(&mut current, rest),
                    });
                    counter += 1;
                }
            }
        }

        if !current.is_empty() {
            groups.push(SlideGroup {
                title,
                slides: current,
            });
        }

        groups
    }

    /// Module boundaries only; groups may exceed the budget.
    fn chunk_by_modules(&self, slides: Vec<SlideRecord>) -> Vec<SlideGroup> {
        let mut groups = Vec::new();
        let mut current: Vec<SlideRecord> = Vec::new();
        let mut title = String::from("Introduction");
        let mut counter = 1usize;

        for slide in slides {
            if slide.is_module_start && !current.is_empty() {
                let next_title = slide
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("Module {}", counter + 1));
                groups.push(SlideGroup {
                    title: mem::replace(&mut title, next_title),
                    slides: mem::take(&mut current),
                });
                counter += 1;
            }
            current.push(slide);
        }

        if !current.is_empty() {
            groups.push(SlideGroup {
                title,
                slides: current,
            });
        }

        groups
    }

    /// Accumulate until the budget overflows, then emit the group without
    /// the overflowing slide and carry it into the next group.
    fn chunk_sequential(&self, slides: Vec<SlideRecord>) -> Vec<SlideGroup> {
        let mut groups = Vec::new();
        let mut current: Vec<SlideRecord> = Vec::new();
        let mut counter = 1usize;

        for slide in slides {
            current.push(slide);

            if self.estimator.estimate_group(&current) > self.config.max_chunk_tokens
                && current.len() > 1
            {
                if let Some(overflow) = current.pop() {
                    groups.push(SlideGroup {
                        title: format!("Section {counter}"),
                        slides: mem::take(&mut current),
                    });
                    counter += 1;
                    current.push(overflow);
                }
            }
        }

        if !current.is_empty() {
            groups.push(SlideGroup {
                title: format!("Section {counter}"),
                slides: current,
            });
        }

        groups
    }

    /// Summary statistics over a chunking result.
    #[must_use]
    pub fn stats(&self, groups: &[SlideGroup]) -> GroupStats {
        GroupStats {
            total_groups: groups.len(),
            total_slides: groups.iter().map(|g| g.slides.len()).sum(),
            total_tokens: groups
                .iter()
                .map(|g| self.estimator.estimate_group(&g.slides))
                .sum(),
        }
    }
}

/// Find the index at which to split an over-budget group.
///
/// Scan backward for the last slide whose activity type is present and
/// differs from its predecessor's; fall back to three quarters of the
/// group, but never before the first slide.
fn find_break_point(slides: &[SlideRecord]) -> usize {
    for i in (1..slides.len()).rev() {
        if slides[i].activity_type.is_some() && slides[i].activity_type != slides[i - 1].activity_type
        {
            return i;
        }
    }

    ((slides.len() as f64 * 0.75) as usize).max(1)
}

/// Statistics about a chunking pass.
#[derive(Debug, Clone, Copy)]
pub struct GroupStats {
    pub total_groups: usize,
    pub total_slides: usize,
    pub total_tokens: usize,
}

impl std::fmt::Display for GroupStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Groups: {} | Slides: {} | Tokens: {}",
            self.total_groups, self.total_slides, self.total_tokens
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckshred_model::ActivityType;
    use pretty_assertions::assert_eq;

    fn slide(number: u32, module_start: bool, content_chars: usize) -> SlideRecord {
        SlideRecord {
            slide_number: number,
            title: Some(format!("Slide {number}")),
            content: vec!["x".repeat(content_chars)],
            is_module_start: module_start,
            ..Default::default()
        }
    }

    fn chunker(strategy: ChunkingStrategy, budget: usize) -> ModuleChunker {
        ModuleChunker::new(ChunkerConfig {
            strategy,
            max_chunk_tokens: budget,
        })
    }

    fn assert_partition(groups: &[SlideGroup], expected_numbers: &[u32]) {
        let actual: Vec<u32> = groups
            .iter()
            .flat_map(|g| g.slides.iter().map(|s| s.slide_number))
            .collect();
        assert_eq!(actual, expected_numbers);
        assert!(groups.iter().all(|g| !g.slides.is_empty()));
    }

    #[test]
    fn empty_input_produces_empty_output() {
        for strategy in [
            ChunkingStrategy::Instructional,
            ChunkingStrategy::ModuleBased,
            ChunkingStrategy::Sequential,
        ] {
            let groups = chunker(strategy, 1500).chunk(Vec::new());
            assert!(groups.is_empty(), "{strategy:?} produced groups");
        }
    }

    #[test]
    fn partition_law_holds_for_all_strategies() {
        let slides: Vec<SlideRecord> = (1..=12)
            .map(|n| slide(n, n == 1 || n == 5 || n == 9, 300))
            .collect();

        for strategy in [
            ChunkingStrategy::Instructional,
            ChunkingStrategy::ModuleBased,
            ChunkingStrategy::Sequential,
        ] {
            for budget in [1, 50, 200, 10_000] {
                let groups = chunker(strategy, budget).chunk(slides.clone());
                assert_partition(&groups, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
            }
        }
    }

    #[test]
    fn instructional_splits_at_module_starts() {
        let slides = vec![
            slide(1, true, 40),
            slide(2, false, 40),
            slide(3, true, 40),
            slide(4, false, 40),
        ];

        let groups = chunker(ChunkingStrategy::Instructional, 10_000).chunk(slides);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].slide_range(), (1, 2));
        assert_eq!(groups[1].slide_range(), (3, 4));
        // The new group takes its title from the module-start slide.
        assert_eq!(groups[1].title, "Slide 3");
        // The first group keeps the default title.
        assert_eq!(groups[0].title, "Introduction");
    }

    #[test]
    fn instructional_breaks_over_budget_groups_with_continued_title() {
        // Budget of 100 tokens = 400 chars; each slide carries 300 chars.
        let slides: Vec<SlideRecord> = (1..=4).map(|n| slide(n, false, 300)).collect();

        let groups = chunker(ChunkingStrategy::Instructional, 100).chunk(slides);
        assert!(groups.len() >= 2);
        assert_partition(&groups, &[1, 2, 3, 4]);
        assert!(groups
            .iter()
            .skip(1)
            .all(|g| g.title.contains("(Continued)")));
    }

    #[test]
    fn break_point_prefers_activity_transition() {
        let mut slides: Vec<SlideRecord> = (1..=4).map(|n| slide(n, false, 10)).collect();
        slides[2].activity_type = Some(ActivityType::HandsOnLab);
        slides[3].activity_type = Some(ActivityType::HandsOnLab);

        assert_eq!(find_break_point(&slides), 2);
    }

    #[test]
    fn break_point_falls_back_to_three_quarters() {
        let slides: Vec<SlideRecord> = (1..=8).map(|n| slide(n, false, 10)).collect();
        assert_eq!(find_break_point(&slides), 6);

        let single = vec![slide(1, false, 10)];
        assert_eq!(find_break_point(&single), 1);
    }

    #[test]
    fn module_based_ignores_budget() {
        let slides: Vec<SlideRecord> = (1..=6)
            .map(|n| slide(n, n == 1, 500))
            .collect();

        let groups = chunker(ChunkingStrategy::ModuleBased, 10).chunk(slides);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].slide_range(), (1, 6));
    }

    #[test]
    fn sequential_emits_groups_under_budget() {
        // 25 tokens per slide; 2 fit under 60, the third overflows.
        let slides: Vec<SlideRecord> = (1..=6).map(|n| slide(n, false, 100)).collect();

        let groups = chunker(ChunkingStrategy::Sequential, 60).chunk(slides);
        assert!(groups.len() >= 2);
        assert_partition(&groups, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(groups[0].title, "Section 1");
        assert_eq!(groups[1].title, "Section 2");
    }

    #[test]
    fn oversized_single_slide_becomes_its_own_group() {
        let slides = vec![slide(1, false, 10), slide(2, false, 5_000), slide(3, false, 10)];

        let groups = chunker(ChunkingStrategy::Sequential, 100).chunk(slides);
        assert_partition(&groups, &[1, 2, 3]);
        // Slide 2 is never split mid-slide; it sits alone in its group.
        let holder = groups
            .iter()
            .find(|g| g.slides.iter().any(|s| s.slide_number == 2))
            .unwrap();
        assert_eq!(holder.slides.len(), 1);
    }

    #[test]
    fn stats_summarize_groups() {
        let slides: Vec<SlideRecord> = (1..=4).map(|n| slide(n, n == 1, 40)).collect();
        let chunker = chunker(ChunkingStrategy::Instructional, 10_000);
        let groups = chunker.chunk(slides);

        let stats = chunker.stats(&groups);
        assert_eq!(stats.total_slides, 4);
        assert_eq!(stats.total_groups, groups.len());
        assert!(stats.to_string().contains("Slides: 4"));
    }
}
