use super::MetricsResponse;
use url::Url;

/// Query key that rides as a path segment instead (non-organic only).
const PATH_SEGMENT_PARAM: &str = "sub_id_2";

/// Assembles the web destination out of the metrics response and the app
/// identity. Pure and deterministic: same inputs, same URL, same parameter
/// order.
///
/// Organic installs get the response URL with only the app identity appended.
/// Non-organic installs additionally carry the routing parameters, with
/// `sub_id_2` promoted to a trailing path segment. Returns `None` when no
/// valid URL can be built from the response.
pub fn build_destination_url(
    response: &MetricsResponse,
    ad_identifier: Option<&str>,
    bundle_id: &str,
    onesignal_id: Option<&str>,
) -> Option<Url> {
    let mut url = Url::parse(&response.url).ok()?;

    if response.is_organic {
        let mut query = url.query_pairs_mut();
        if let Some(idfa) = ad_identifier {
            query.append_pair("idfa", idfa);
        }
        query.append_pair("bundle", bundle_id);
        if let Some(onesignal) = onesignal_id {
            query.append_pair("onesignal_id", onesignal);
        }
        drop(query);
        return Some(url);
    }

    if let Some(segment) = response.params.get(PATH_SEGMENT_PARAM) {
        url.path_segments_mut().ok()?.pop_if_empty().push(segment);
    }

    let mut query = url.query_pairs_mut();
    for (key, value) in &response.params {
        if key != PATH_SEGMENT_PARAM {
            query.append_pair(key, value);
        }
    }
    query.append_pair("bundle", bundle_id);
    if let Some(idfa) = ad_identifier {
        query.append_pair("idfa", idfa);
    }
    if let Some(onesignal) = onesignal_id {
        query.append_pair("onesignal_id", onesignal);
    }
    drop(query);

    Some(url)
}
