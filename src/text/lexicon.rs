/// Substrings that mark normalized text as skincare related.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "skin", "eczema", "psoriasis", "rash", "itch", "eucerin", "flare", "acne", "pimple",
    "blackhead", "whitehead", "rosacea", "dermatitis", "hyperpigmentation", "dark spots",
    "redness", "sensitive", "barrier", "spf", "sunscreen", "dryness", "oily", "scarring",
    "acne scars", "maskne", "allergic reaction", "hives", "bumps", "moisturizer",
    "moisturiser", "cleanser", "serum", "retinol", "tretinoin", "niacinamide", "hyaluronic",
    "ceramide", "exfoliat", "toner", "breakout", "pores", "dermatologist", "sunburn",
    "wrinkle", "complexion",
];

/// Standard English stop words.
pub const STANDARD_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor",
    "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Domain-generic terms that dominate skincare text without saying anything.
pub const CUSTOM_STOPWORDS: &[&str] = &[
    // generic
    "skin", "amp", "feel", "product", "products", "im", "ive", "id", "didnt", "dont", "bad",
    "help", "get", "got", "really", "use", "using", "used", "like", "know", "think", "one",
    "also", "bit", "make", "made", "thing", "things", "lot", "much", "even", "still", "go",
    // numerals
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10",
    // temporal
    "day", "days", "week", "weeks", "month", "months", "year", "years", "today", "time",
    "morning", "night", "started", "start",
    // platform
    "video", "videos", "channel", "subscribe", "youtube", "watch", "comment", "comments",
    "link", "shorts", "vlog", "http", "https", "www", "com",
];

/// Words that count toward a positive sentiment score.
pub const POSITIVE_WORDS: &[&str] = &[
    "love", "loved", "loves", "amazing", "awesome", "best", "better", "beautiful", "calm",
    "calming", "clear", "cleared", "clearer", "comfortable", "effective", "excellent",
    "fantastic", "favorite", "favourite", "fresh", "gentle", "glow", "glowing", "good",
    "great", "happy", "healed", "healing", "healthy", "helpful", "hydrated", "hydrating",
    "improved", "improvement", "incredible", "lightweight", "nice", "nourishing", "perfect",
    "pleased", "radiant", "recommend", "recommended", "relief", "saved", "smooth", "soft",
    "soothing", "thank", "thanks", "wonderful", "works", "worth",
];

/// Words that count toward a negative sentiment score.
pub const NEGATIVE_WORDS: &[&str] = &[
    "awful", "bad", "badly", "broke", "burn", "burned", "burning", "burns", "clogged",
    "disappointed", "disappointing", "dry", "expensive", "fail", "failed", "greasy",
    "hate", "hated", "horrible", "irritated", "irritating", "irritation", "itchy", "pain",
    "painful", "peeling", "poor", "rash", "reaction", "regret", "sore", "sting", "stinging",
    "sticky", "terrible", "ugly", "useless", "waste", "worse", "worst",
];
