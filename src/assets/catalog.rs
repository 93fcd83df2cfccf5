//! Well-known app names warmed into the ambient icon pool.

/// Catalog names, looked up one at a time with a single result each.
pub const DEFAULT_CATALOG: &[&str] = &[
    // Social
    "Instagram",
    "TikTok",
    "WeChat",
    "Facebook",
    "Twitter",
    "LinkedIn",
    "Snapchat",
    "Pinterest",
    "Reddit",
    "Tumblr",
    "Line",
    "Twitch",
    // Messaging
    "WhatsApp",
    "Telegram",
    "Discord",
    "Messenger",
    "Skype",
    "Signal",
    "Viber",
    "Slack",
    // Music and video
    "Spotify",
    "YouTube",
    "Netflix",
    "Disney+",
    "Apple Music",
    "Prime Video",
    "HBO Max",
    "Hulu",
    "SoundCloud",
    "Deezer",
    "Tidal",
    "Pandora",
    // Productivity
    "Microsoft Teams",
    "Zoom",
    "Notion",
    "Trello",
    "Asana",
    "Monday",
    "Evernote",
    "Todoist",
    "Microsoft Office",
    "Google Drive",
    "Dropbox",
    "Box",
    // Finance
    "PayPal",
    "Venmo",
    "Cash App",
    "Stripe",
    "Coinbase",
    "Robinhood",
    "Square",
    "Wise",
    // Travel and maps
    "Uber",
    "Lyft",
    "Google Maps",
    "Waze",
    "Airbnb",
    "Booking.com",
    "Expedia",
    "TripAdvisor",
    // Shopping
    "Amazon",
    "eBay",
    "Shopify",
    "Walmart",
    "Target",
    "SHEIN",
    "Wish",
    "Etsy",
    // News and reading
    "Medium",
    "Substack",
    "Apple News",
    "Flipboard",
    "Kindle",
    "Audible",
    "Pocket",
    "Feedly",
    // Health and fitness
    "Strava",
    "Nike Run Club",
    "Fitbit",
    "MyFitnessPal",
    "Calm",
    "Headspace",
    "Peloton",
    "AllTrails",
];
