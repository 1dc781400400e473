//! Shared block types for the content pipeline.
//!
//! These types are produced by the external markup tokenizer (raw side) and
//! by the block parser (enriched side), and are consumed throughout the
//! resolvers and by downstream renderers. They live here so that parser
//! modules can import them without depending on each other.
//!
//! [`RawBlock`] keeps every payload as a `serde_json::Value`: the markup
//! serializer is deliberately tolerant (a list may arrive where an object
//! was expected), so shape checking belongs to the parse functions, not to
//! deserialization. [`EnrichedBlock`] is the validated counterpart; it is
//! always producible from any raw block, carrying safe defaults and a
//! `parseErrors` list when validation fails.

use crate::error::ParseError;
use crate::span::{SimpleText, Span};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ──────────────────────────────────────────────
// Raw blocks (tokenizer output)
// ──────────────────────────────────────────────

/// One tokenizer-produced unit of document content, keyed by its `type`
/// string. The `value` payload is a bare string or a loosely-typed
/// object/array depending on the type; parse functions runtime-check the
/// declared shape before trusting it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum RawBlock {
    Text(Value),
    Heading(Value),
    List(Value),
    NumberedList(Value),
    PullQuote(Value),
    HorizontalRule(Value),
    Image(Value),
    Chart(Value),
    ChartStory(Value),
    Scroller(Value),
    Callout(Value),
    Aside(Value),
    Recirc(Value),
    StickyLeft(Value),
    StickyRight(Value),
    SideBySide(Value),
    GraySection(Value),
    ProminentLink(Value),
    TopicPageIntro(Value),
    KeyInsights(Value),
    ResearchAndWriting(Value),
    ExpandableParagraph(Value),
    Align(Value),
    Html(Value),
    SdgGrid(Value),
    SdgToc(Value),
    MissingData(Value),
    AllCharts(Value),
    AdditionalCharts(Value),
    /// Only meaningful inside specific containers (scrollers, chart
    /// stories); dropped everywhere else.
    Url(Value),
    /// Only meaningful inside specific containers; dropped everywhere else.
    Position(Value),
}

impl RawBlock {
    /// The `type` discriminator string of this block.
    pub fn kind(&self) -> &'static str {
        match self {
            RawBlock::Text(_) => "text",
            RawBlock::Heading(_) => "heading",
            RawBlock::List(_) => "list",
            RawBlock::NumberedList(_) => "numbered-list",
            RawBlock::PullQuote(_) => "pull-quote",
            RawBlock::HorizontalRule(_) => "horizontal-rule",
            RawBlock::Image(_) => "image",
            RawBlock::Chart(_) => "chart",
            RawBlock::ChartStory(_) => "chart-story",
            RawBlock::Scroller(_) => "scroller",
            RawBlock::Callout(_) => "callout",
            RawBlock::Aside(_) => "aside",
            RawBlock::Recirc(_) => "recirc",
            RawBlock::StickyLeft(_) => "sticky-left",
            RawBlock::StickyRight(_) => "sticky-right",
            RawBlock::SideBySide(_) => "side-by-side",
            RawBlock::GraySection(_) => "gray-section",
            RawBlock::ProminentLink(_) => "prominent-link",
            RawBlock::TopicPageIntro(_) => "topic-page-intro",
            RawBlock::KeyInsights(_) => "key-insights",
            RawBlock::ResearchAndWriting(_) => "research-and-writing",
            RawBlock::ExpandableParagraph(_) => "expandable-paragraph",
            RawBlock::Align(_) => "align",
            RawBlock::Html(_) => "html",
            RawBlock::SdgGrid(_) => "sdg-grid",
            RawBlock::SdgToc(_) => "sdg-toc",
            RawBlock::MissingData(_) => "missing-data",
            RawBlock::AllCharts(_) => "all-charts",
            RawBlock::AdditionalCharts(_) => "additional-charts",
            RawBlock::Url(_) => "url",
            RawBlock::Position(_) => "position",
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            RawBlock::Text(value)
            | RawBlock::Heading(value)
            | RawBlock::List(value)
            | RawBlock::NumberedList(value)
            | RawBlock::PullQuote(value)
            | RawBlock::HorizontalRule(value)
            | RawBlock::Image(value)
            | RawBlock::Chart(value)
            | RawBlock::ChartStory(value)
            | RawBlock::Scroller(value)
            | RawBlock::Callout(value)
            | RawBlock::Aside(value)
            | RawBlock::Recirc(value)
            | RawBlock::StickyLeft(value)
            | RawBlock::StickyRight(value)
            | RawBlock::SideBySide(value)
            | RawBlock::GraySection(value)
            | RawBlock::ProminentLink(value)
            | RawBlock::TopicPageIntro(value)
            | RawBlock::KeyInsights(value)
            | RawBlock::ResearchAndWriting(value)
            | RawBlock::ExpandableParagraph(value)
            | RawBlock::Align(value)
            | RawBlock::Html(value)
            | RawBlock::SdgGrid(value)
            | RawBlock::SdgToc(value)
            | RawBlock::MissingData(value)
            | RawBlock::AllCharts(value)
            | RawBlock::AdditionalCharts(value)
            | RawBlock::Url(value)
            | RawBlock::Position(value) => value,
        }
    }
}

// ──────────────────────────────────────────────
// Enriched blocks (parser output)
// ──────────────────────────────────────────────

/// The validated counterpart of a raw block, carrying only well-typed
/// fields plus the diagnostics accumulated while parsing it.
///
/// There is one variant per raw block kind except `url`/`position` (which
/// enrich to nothing), plus `simple-text`, which exists only on the
/// enriched level for contexts that exclude formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EnrichedBlock {
    Text(TextBlock),
    SimpleText(SimpleTextBlock),
    Heading(HeadingBlock),
    List(ListBlock),
    NumberedList(ListBlock),
    PullQuote(PullQuoteBlock),
    HorizontalRule(MarkerBlock),
    Image(ImageBlock),
    Chart(ChartBlock),
    ChartStory(ChartStoryBlock),
    Scroller(ScrollerBlock),
    Callout(CalloutBlock),
    Aside(AsideBlock),
    Recirc(RecircBlock),
    StickyLeft(ColumnsBlock),
    StickyRight(ColumnsBlock),
    SideBySide(ColumnsBlock),
    GraySection(GraySectionBlock),
    ProminentLink(ProminentLinkBlock),
    TopicPageIntro(TopicPageIntroBlock),
    KeyInsights(KeyInsightsBlock),
    ResearchAndWriting(ResearchAndWritingBlock),
    ExpandableParagraph(ExpandableParagraphBlock),
    Align(AlignBlock),
    Html(HtmlBlock),
    SdgGrid(SdgGridBlock),
    SdgToc(MarkerBlock),
    MissingData(MarkerBlock),
    AllCharts(AllChartsBlock),
    AdditionalCharts(AdditionalChartsBlock),
}

impl EnrichedBlock {
    /// The `type` discriminator string of this block.
    pub fn kind(&self) -> &'static str {
        match self {
            EnrichedBlock::Text(_) => "text",
            EnrichedBlock::SimpleText(_) => "simple-text",
            EnrichedBlock::Heading(_) => "heading",
            EnrichedBlock::List(_) => "list",
            EnrichedBlock::NumberedList(_) => "numbered-list",
            EnrichedBlock::PullQuote(_) => "pull-quote",
            EnrichedBlock::HorizontalRule(_) => "horizontal-rule",
            EnrichedBlock::Image(_) => "image",
            EnrichedBlock::Chart(_) => "chart",
            EnrichedBlock::ChartStory(_) => "chart-story",
            EnrichedBlock::Scroller(_) => "scroller",
            EnrichedBlock::Callout(_) => "callout",
            EnrichedBlock::Aside(_) => "aside",
            EnrichedBlock::Recirc(_) => "recirc",
            EnrichedBlock::StickyLeft(_) => "sticky-left",
            EnrichedBlock::StickyRight(_) => "sticky-right",
            EnrichedBlock::SideBySide(_) => "side-by-side",
            EnrichedBlock::GraySection(_) => "gray-section",
            EnrichedBlock::ProminentLink(_) => "prominent-link",
            EnrichedBlock::TopicPageIntro(_) => "topic-page-intro",
            EnrichedBlock::KeyInsights(_) => "key-insights",
            EnrichedBlock::ResearchAndWriting(_) => "research-and-writing",
            EnrichedBlock::ExpandableParagraph(_) => "expandable-paragraph",
            EnrichedBlock::Align(_) => "align",
            EnrichedBlock::Html(_) => "html",
            EnrichedBlock::SdgGrid(_) => "sdg-grid",
            EnrichedBlock::SdgToc(_) => "sdg-toc",
            EnrichedBlock::MissingData(_) => "missing-data",
            EnrichedBlock::AllCharts(_) => "all-charts",
            EnrichedBlock::AdditionalCharts(_) => "additional-charts",
        }
    }

    /// The diagnostics attached to this block (not including those of
    /// nested blocks).
    pub fn parse_errors(&self) -> &[ParseError] {
        match self {
            EnrichedBlock::Text(block) => &block.parse_errors,
            EnrichedBlock::SimpleText(block) => &block.parse_errors,
            EnrichedBlock::Heading(block) => &block.parse_errors,
            EnrichedBlock::List(block) | EnrichedBlock::NumberedList(block) => &block.parse_errors,
            EnrichedBlock::PullQuote(block) => &block.parse_errors,
            EnrichedBlock::HorizontalRule(block)
            | EnrichedBlock::SdgToc(block)
            | EnrichedBlock::MissingData(block) => &block.parse_errors,
            EnrichedBlock::Image(block) => &block.parse_errors,
            EnrichedBlock::Chart(block) => &block.parse_errors,
            EnrichedBlock::ChartStory(block) => &block.parse_errors,
            EnrichedBlock::Scroller(block) => &block.parse_errors,
            EnrichedBlock::Callout(block) => &block.parse_errors,
            EnrichedBlock::Aside(block) => &block.parse_errors,
            EnrichedBlock::Recirc(block) => &block.parse_errors,
            EnrichedBlock::StickyLeft(block)
            | EnrichedBlock::StickyRight(block)
            | EnrichedBlock::SideBySide(block) => &block.parse_errors,
            EnrichedBlock::GraySection(block) => &block.parse_errors,
            EnrichedBlock::ProminentLink(block) => &block.parse_errors,
            EnrichedBlock::TopicPageIntro(block) => &block.parse_errors,
            EnrichedBlock::KeyInsights(block) => &block.parse_errors,
            EnrichedBlock::ResearchAndWriting(block) => &block.parse_errors,
            EnrichedBlock::ExpandableParagraph(block) => &block.parse_errors,
            EnrichedBlock::Align(block) => &block.parse_errors,
            EnrichedBlock::Html(block) => &block.parse_errors,
            EnrichedBlock::SdgGrid(block) => &block.parse_errors,
            EnrichedBlock::AllCharts(block) => &block.parse_errors,
            EnrichedBlock::AdditionalCharts(block) => &block.parse_errors,
        }
    }

    /// Nested enriched blocks, for callers walking the tree. Blocks that
    /// nest text blocks under dedicated payloads (scroller, chart story,
    /// topic page intro) expose those too.
    pub fn children(&self) -> Vec<&EnrichedBlock> {
        match self {
            EnrichedBlock::StickyLeft(block)
            | EnrichedBlock::StickyRight(block)
            | EnrichedBlock::SideBySide(block) => {
                block.left.iter().chain(block.right.iter()).collect()
            }
            EnrichedBlock::GraySection(block) => block.items.iter().collect(),
            EnrichedBlock::Callout(block) => block.text.iter().collect(),
            EnrichedBlock::ExpandableParagraph(block) => block.items.iter().collect(),
            EnrichedBlock::Align(block) => block.content.iter().collect(),
            EnrichedBlock::KeyInsights(block) => block
                .insights
                .iter()
                .flat_map(|insight| insight.content.iter())
                .collect(),
            _ => Vec::new(),
        }
    }
}

// ──────────────────────────────────────────────
// Text-family payloads
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub value: Vec<Span>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimpleTextBlock {
    pub value: SimpleText,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadingBlock {
    pub text: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertitle: Option<Vec<Span>>,
    pub level: u8,
    pub parse_errors: Vec<ParseError>,
}

/// Shared by `list` and `numbered-list`; the numbering itself is never
/// retained (renderers re-number).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListBlock {
    pub items: Vec<TextBlock>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PullQuoteBlock {
    pub text: Vec<SimpleText>,
    pub parse_errors: Vec<ParseError>,
}

/// Payload of marker-like blocks (`horizontal-rule`, `sdg-toc`,
/// `missing-data`): the dummy value is passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkerBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HtmlBlock {
    pub value: String,
    pub parse_errors: Vec<ParseError>,
}

// ──────────────────────────────────────────────
// Media payloads
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Narrow,
    #[default]
    Wide,
}

impl ImageSize {
    pub fn from_keyword(keyword: &str) -> Option<ImageSize> {
        match keyword {
            "narrow" => Some(ImageSize::Narrow),
            "wide" => Some(ImageSize::Wide),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<Vec<Span>>,
    pub size: ImageSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_width: Option<u32>,
    pub parse_errors: Vec<ParseError>,
}

/// Side placement of an aside.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockPosition {
    Left,
    Right,
}

impl BlockPosition {
    pub fn from_keyword(keyword: &str) -> Option<BlockPosition> {
        match keyword {
            "left" => Some(BlockPosition::Left),
            "right" => Some(BlockPosition::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AsideBlock {
    pub caption: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<BlockPosition>,
    pub parse_errors: Vec<ParseError>,
}

// ──────────────────────────────────────────────
// Chart payloads
// ──────────────────────────────────────────────

/// Interactive controls a chart embed may expose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChartControl {
    All,
    RelativeToggle,
    Timeline,
    FacetControl,
    EntitySelector,
    ZoomToggle,
    NoDataAreaToggle,
    AlignAxisScalesToggle,
    XLogLinearSelector,
    YLogLinearSelector,
}

impl ChartControl {
    pub const KEYWORDS: &'static [&'static str] = &[
        "all",
        "relativeToggle",
        "timeline",
        "facetControl",
        "entitySelector",
        "zoomToggle",
        "noDataAreaToggle",
        "alignAxisScalesToggle",
        "xLogLinearSelector",
        "yLogLinearSelector",
    ];

    pub fn from_keyword(keyword: &str) -> Option<ChartControl> {
        match keyword {
            "all" => Some(ChartControl::All),
            "relativeToggle" => Some(ChartControl::RelativeToggle),
            "timeline" => Some(ChartControl::Timeline),
            "facetControl" => Some(ChartControl::FacetControl),
            "entitySelector" => Some(ChartControl::EntitySelector),
            "zoomToggle" => Some(ChartControl::ZoomToggle),
            "noDataAreaToggle" => Some(ChartControl::NoDataAreaToggle),
            "alignAxisScalesToggle" => Some(ChartControl::AlignAxisScalesToggle),
            "xLogLinearSelector" => Some(ChartControl::XLogLinearSelector),
            "yLogLinearSelector" => Some(ChartControl::YLogLinearSelector),
            _ => None,
        }
    }
}

/// Tabs a chart embed may show.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartTab {
    All,
    Chart,
    Map,
    Table,
    Download,
}

impl ChartTab {
    pub const KEYWORDS: &'static [&'static str] = &["all", "chart", "map", "table", "download"];

    pub fn from_keyword(keyword: &str) -> Option<ChartTab> {
        match keyword {
            "all" => Some(ChartTab::All),
            "chart" => Some(ChartTab::Chart),
            "map" => Some(ChartTab::Map),
            "table" => Some(ChartTab::Table),
            "download" => Some(ChartTab::Download),
            _ => None,
        }
    }
}

/// The only supported chart placement keyword.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartPosition {
    Featured,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartBlock {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ChartPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<Vec<Span>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controls: Option<Vec<ChartControl>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<ChartTab>>,
    pub parse_errors: Vec<ParseError>,
}

impl ChartBlock {
    /// A chart that is nothing but a url, as produced by the bare-string
    /// form of the raw block.
    pub fn from_url(url: impl Into<String>) -> ChartBlock {
        ChartBlock {
            url: url.into(),
            ..ChartBlock::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartStoryItem {
    pub narrative: TextBlock,
    pub chart: ChartBlock,
    pub technical: Vec<TextBlock>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartStoryBlock {
    pub items: Vec<ChartStoryItem>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrollerItem {
    pub url: String,
    pub text: TextBlock,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrollerBlock {
    pub blocks: Vec<ScrollerItem>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllChartsItem {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllChartsBlock {
    pub heading: String,
    pub top: Vec<AllChartsItem>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalChartsBlock {
    pub items: Vec<Vec<Span>>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SdgGridItem {
    pub goal: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SdgGridBlock {
    pub items: Vec<SdgGridItem>,
    pub parse_errors: Vec<ParseError>,
}

// ──────────────────────────────────────────────
// Container payloads
// ──────────────────────────────────────────────

/// Shared by the two-column containers (`sticky-left`, `sticky-right`,
/// `side-by-side`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsBlock {
    pub left: Vec<EnrichedBlock>,
    pub right: Vec<EnrichedBlock>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraySectionBlock {
    pub items: Vec<EnrichedBlock>,
    pub parse_errors: Vec<ParseError>,
}

/// Nested blocks are restricted to text, list, and heading kinds; the
/// parser enforces this.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalloutBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: Vec<EnrichedBlock>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpandableParagraphBlock {
    pub items: Vec<EnrichedBlock>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    pub const KEYWORDS: &'static [&'static str] = &["left", "center", "right"];

    pub fn from_keyword(keyword: &str) -> Option<HorizontalAlign> {
        match keyword {
            "left" => Some(HorizontalAlign::Left),
            "center" => Some(HorizontalAlign::Center),
            "right" => Some(HorizontalAlign::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlignBlock {
    pub alignment: HorizontalAlign,
    pub content: Vec<EnrichedBlock>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyInsightSlide {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub content: Vec<EnrichedBlock>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyInsightsBlock {
    pub heading: String,
    pub insights: Vec<KeyInsightSlide>,
    pub parse_errors: Vec<ParseError>,
}

// ──────────────────────────────────────────────
// Link-promo payloads
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecircLink {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecircBlock {
    pub title: SimpleText,
    pub links: Vec<RecircLink>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProminentLinkBlock {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub parse_errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicPageIntroDownloadButton {
    pub text: String,
    pub url: String,
}

/// A related topic link. Document links carry no text; their titles are
/// resolved later from the linked document's own metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicPageIntroRelatedTopic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicPageIntroBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_button: Option<TopicPageIntroDownloadButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_topics: Option<Vec<TopicPageIntroRelatedTopic>>,
    pub content: Vec<TextBlock>,
    pub parse_errors: Vec<ParseError>,
}

/// One article link in a research-and-writing block. Document links carry
/// no metadata of their own; everything else names its authors and title
/// explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResearchAndWritingLink {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResearchAndWritingRow {
    pub heading: String,
    pub articles: Vec<ResearchAndWritingLink>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResearchAndWritingBlock {
    pub primary: ResearchAndWritingLink,
    pub secondary: ResearchAndWritingLink,
    pub more: ResearchAndWritingRow,
    pub rows: Vec<ResearchAndWritingRow>,
    pub parse_errors: Vec<ParseError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_blocks_deserialize_from_tagged_json() {
        let chart: RawBlock =
            serde_json::from_value(json!({ "type": "chart", "value": { "url": "/charts/x" } }))
                .unwrap();
        assert_eq!(chart.kind(), "chart");
        assert_eq!(chart.value()["url"], "/charts/x");

        let text: RawBlock =
            serde_json::from_value(json!({ "type": "text", "value": "hello" })).unwrap();
        assert!(matches!(text, RawBlock::Text(Value::String(ref s)) if s == "hello"));
    }

    #[test]
    fn unknown_raw_block_types_are_rejected() {
        let result: Result<RawBlock, _> =
            serde_json::from_value(json!({ "type": "hologram", "value": {} }));
        assert!(result.is_err());
    }

    #[test]
    fn enriched_blocks_serialize_with_type_tag_and_camel_case() {
        let block = EnrichedBlock::Chart(ChartBlock {
            url: "/charts/life-expectancy".to_owned(),
            parse_errors: vec![ParseError::new("url property is missing")],
            ..ChartBlock::default()
        });
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "chart");
        assert_eq!(json["url"], "/charts/life-expectancy");
        assert_eq!(json["parseErrors"][0]["message"], "url property is missing");
        // optional fields are omitted entirely
        assert!(json.get("caption").is_none());
    }

    #[test]
    fn enriched_block_round_trips_through_json() {
        let block = EnrichedBlock::Heading(HeadingBlock {
            text: vec![Span::simple_text("Title")],
            supertitle: None,
            level: 2,
            parse_errors: vec![],
        });
        let json = serde_json::to_value(&block).unwrap();
        let back: EnrichedBlock = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn keyword_sets_match_their_wire_forms() {
        for keyword in ChartControl::KEYWORDS {
            let control = ChartControl::from_keyword(keyword).unwrap();
            assert_eq!(serde_json::to_value(control).unwrap(), json!(*keyword));
        }
        for keyword in ChartTab::KEYWORDS {
            let tab = ChartTab::from_keyword(keyword).unwrap();
            assert_eq!(serde_json::to_value(tab).unwrap(), json!(*keyword));
        }
        assert!(ChartControl::from_keyword("sparkline").is_none());
    }
}
