//! Demo email template: a styled, three-level nested table layout.

use crate::view::EditorView;
use crate::EditorError;
use tabula_schema::DomParser;
use tracing::info;

pub const EMAIL_TEMPLATE: &str = r##"
<table align="left" border="0" cellpadding="0" cellspacing="0" height="100%" style="font-family: Arial; font-size:12px;  width:540px; table-layout: fixed;" ><tbody><tr><td align="left" valign="top"><table align="center" border="0" cellpadding="0" cellspacing="0" class="informationTabs TableEditor" height="100%" style="font-family: Arial; font-size:12px;  width:410px; table-layout: fixed;"><tbody><tr><td align="center" valign="top"><table align="center" border="0" cellpadding="0" cellspacing="0" class="editorTable" style=" width:410px; table-layout: fixed;"><tbody><tr><td style="text-align: center; vertical-align: top;"><div style="width: 129px;height: 37.4px;background-color: #0f9bd3;margin: 0;border-radius: 0 0 8px 8px;"><div style="width:85px; display: inline-block"><span class="countOfPhoto" style="display: block;font-size: 15px;color: white;line-height: 20px;font-weight: bold;padding-top: 3px;">%pCount%</span> <span style="display: block;color: white;font-size: 8px;line-height: 10px;">Photos</span></div><div style="width: 40px;display: inline-block;line-height: 1;text-align: left;vertical-align: top;"><p style="margin: 9px 0 0 0;"><img src="https://imtest.net.au/Content/images/tenanatPortal/EmailCamera.png" style="width:18px" width="18" /></p><div>&nbsp;</div></div></div></td><td style="text-align: center; vertical-align: top;"><div style="width: 129px;height: 37.4px;background-color: #58bb71;margin: 0;border-radius: 0 0 8px 8px;"><div style="width:85px; display: inline-block"><span class="countOfVideo" style="display: block;font-size: 15px;color: white;line-height: 20px;font-weight: bold;padding-top: 3px;">%vCount%</span> <span style="display: block;color: white;font-size: 8px;line-height: 10px;">Videos</span></div><div style="width: 40px;display: inline-block;line-height: 1;text-align: left;vertical-align: top;"><p style="margin: 11px 0 0 0;"><img src="https://imtest.net.au/Content/images/tenanatPortal/EmailVideo.png" style="width:22px" width="22" /></p><div>&nbsp;</div></div></div></td><td style="text-align: center; vertical-align: top;"><div style="width: 129px;height: 37.4px;background-color: #e32c28;margin: 0;border-radius: 0 0 8px 8px;"><div style="width:85px; display: inline-block"><span class="countOfAction" style="display: block;font-size: 15px;color: white;line-height: 18px;font-weight: bold;padding-top: 2px;">%wCount%</span> <span style="display: block;color: white;font-size: 8px;line-height: 8px;">Actions req by Landlords</span></div><div style="width: 40px;display: inline-block;line-height: 1;text-align: left;vertical-align: top;"><p style="margin: 11px 0 0 0;"><img src="https://imtest.net.au/Content/images/tenanatPortal/EmailAction.png" style="width:18px" width="18" /></p><div>&nbsp;</div></div></div></td></tr></tbody></table></td></tr></tbody></table><p>&nbsp;<span>%Report Link%</span></p><p>&nbsp;</p><p>&nbsp;</p><p>&nbsp;</p><p>&nbsp;</p><p>Outgoing</p><table></table><table></table><table></table></td></tr></tbody></table>
"##;

/// Parse the email template with the general parser and insert it at the
/// view's selection as one undo step
pub fn insert_email_template(view: &mut EditorView) -> Result<(), EditorError> {
    let doc = DomParser::from_schema(view.schema()).parse_html(EMAIL_TEMPLATE);
    info!(view = %view.id, blocks = doc.child_count(), "inserting email template");
    view.replace_selection_with(doc.content, "insert email template")
}
