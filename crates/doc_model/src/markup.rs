//! WordprocessingML element and attribute names
//!
//! Together with the classifier, this is the only place that knows the
//! backing format's vocabulary.

pub const DOCUMENT: &str = "w:document";
pub const BODY: &str = "w:body";
pub const COMMENTS: &str = "w:comments";
pub const COMMENT: &str = "w:comment";
pub const TEXTBOX_CONTENT: &str = "w:txbxContent";

pub const PARAGRAPH: &str = "w:p";
pub const TABLE: &str = "w:tbl";
pub const TABLE_ROW: &str = "w:tr";
pub const TABLE_CELL: &str = "w:tc";

pub const RUN: &str = "w:r";
pub const TEXT: &str = "w:t";
pub const TAB: &str = "w:tab";
pub const BREAK: &str = "w:br";
pub const CARRIAGE_RETURN: &str = "w:cr";

pub const HYPERLINK: &str = "w:hyperlink";
pub const SIMPLE_FIELD: &str = "w:fldSimple";
pub const INSERTION: &str = "w:ins";
pub const SMART_TAG: &str = "w:smartTag";
pub const CUSTOM_XML: &str = "w:customXml";

pub const SDT: &str = "w:sdt";
pub const SDT_PROPERTIES: &str = "w:sdtPr";
pub const SDT_CONTENT: &str = "w:sdtContent";
pub const TAG: &str = "w:tag";
pub const ALIAS: &str = "w:alias";
pub const LOCK: &str = "w:lock";

pub const VAL: &str = "w:val";
pub const ID: &str = "w:id";
pub const AUTHOR: &str = "w:author";
pub const INITIALS: &str = "w:initials";
pub const DATE: &str = "w:date";
pub const INSTRUCTION: &str = "w:instr";
pub const RELATIONSHIP_ID: &str = "r:id";
pub const XML_SPACE: &str = "xml:space";
