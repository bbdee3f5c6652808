//! Gift-link composition
//!
//! Pure string construction: pull the product identifier out of the
//! resolved URL and substitute it into one of the fixed outbound templates.
//! No network, no persistence.

use chrono::{DateTime, Utc};
use giftlink_types::TemplateKind;
use url::Url;

use crate::error::CoreError;

/// Query parameter carrying the product identifier on resolved URLs
pub const PRODUCT_ID_PARAM: &str = "goods_id";

/// A composed outbound link plus the identifier it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedLink {
    /// The outbound gift link
    pub url: String,
    /// The extracted product identifier, surfaced for display
    pub product_id: String,
}

/// Extract the raw product identifier from the final URL's query string.
///
/// The value is taken verbatim (no percent-decoding) so the identifier lands
/// in the template exactly as the host emitted it. Empty values count as
/// absent.
pub fn extract_product_id(final_url: &Url) -> Option<String> {
    final_url.query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == PRODUCT_ID_PARAM && !value.is_empty()).then(|| value.to_string())
    })
}

/// Compose an outbound gift link from a resolved URL.
///
/// `now` feeds the millisecond nonce the full-return template carries; the
/// standard template ignores it.
pub fn compose(
    final_url: &Url,
    kind: TemplateKind,
    now: DateTime<Utc>,
) -> Result<ComposedLink, CoreError> {
    let product_id = extract_product_id(final_url).ok_or(CoreError::ProductIdNotFound)?;

    let url = match kind {
        TemplateKind::Standard => format!(
            "https://app.temu.com/ph-en/kuiper/un1.html?subj=feed-un&_bg_fs=1\
             &_p_mat1_type=3&_p_jump_id=722&_x_vst_scene=adg&goods_id={product_id}"
        ),
        TemplateKind::FullReturn => {
            let nonce = now.timestamp_millis();
            format!(
                "https://app.temu.com/bgnb_all_return.html?_bg_fs=1&_activity_type=FULL_RETURN\
                 &_mkt_usr_p_from=PUSH&_x_nw_usr_trace_id=3420149110752721920&et={nonce}\
                 &_x_mkt_acty_trace_id=7565616451834381312\
                 &_x_mkt_algo_dist_id=db3e20779acc464592f0df5012056ae5\
                 &nz_goods=[{product_id}]\
                 &_g_i_codes=[%22{product_id}_%25262562233096%2526%2526%2526%2526-1%22]\
                 &site_id=127&mmid=bab57976c44b403ea3579926e2f9d1ddCHN2\
                 &_x_chat_msg_id=1734523823863026&_x_sessn_id=7m3s2g99co\
                 &refer_page_name=message_box&refer_page_id=10080_1734526286662_hj0l5rk2ct\
                 &refer_page_sn=10080"
            )
        }
    };

    Ok(ComposedLink { url, product_id })
}
