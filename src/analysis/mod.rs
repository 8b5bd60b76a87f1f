pub mod channels;
pub mod filter;
pub mod ngrams;
pub mod sentiment;
pub mod summary;

use crate::models::{CommentRecord, VideoRecord};
use crate::text::{self, DomainMatcher};

/// Fill clean_text, word_count and is_in_domain from the raw title + description.
pub fn enrich_video(v: &mut VideoRecord, matcher: &DomainMatcher) {
    v.clean_text = text::normalize(&v.full_text());
    v.word_count = text::word_count(&v.clean_text);
    v.is_in_domain = matcher.is_in_domain(&v.clean_text);
}

pub fn enrich_comment(c: &mut CommentRecord, matcher: &DomainMatcher) {
    c.clean_text = text::normalize(&c.comment_text);
    c.word_count = text::word_count(&c.clean_text);
    c.is_in_domain = matcher.is_in_domain(&c.clean_text);
}
