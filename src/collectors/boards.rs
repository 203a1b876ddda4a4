//! Board slugs, company endpoints, and query matrices. All public, no auth.

pub const GREENHOUSE_BOARDS: &[&str] = &[
    // Big tech / adjacents
    "stripe", "openai", "anthropic", "figma", "notion", "airbnb", "coinbase",
    "databricks", "snowflake", "linear",
    // AI / ML
    "scaleai", "weightsandbiases", "huggingface", "cohere", "runway",
    "characterai", "adept", "together", "modal", "replicate", "anyscale",
    // Fintech
    "brex", "robinhood", "chime", "plaid", "ramp", "affirm", "marqeta",
    "mercury", "deel", "gusto",
    // SaaS / Cloud
    "datadoghq", "elastic", "confluent", "hashicorp", "instacart", "gong",
    "roblox", "asana", "dropbox", "gitlab", "okta", "zoom", "twilio",
    "cloudflare", "fastly",
    // Infra / DevTools
    "sentry", "grafana", "airbyte", "amplitude", "mixpanel", "dbt", "vanta",
    "benchling", "webflow", "checkr", "flexport", "loom", "carta",
    // Marketplace / Consumer
    "pinterest", "doordash", "discord", "reddit", "twitch",
    // Deep tech
    "anduril", "nuro", "skydio", "rivian",
    // Other
    "canva", "lattice", "ironclad", "palantir", "sqsp",
];

pub const LEVER_BOARDS: &[&str] = &[
    "netflix", "lyft", "shopify", "duolingo", "miro", "zapier", "quora",
    "yelp", "zillow",
    // Ed-tech / travel
    "coursera", "udemy", "masterclass", "hopper", "kayak",
    // Fintech
    "revolut", "monzo", "nubank", "klarna", "airwallex", "remitly", "wise",
    "checkout", "wealthfront",
    // Marketplace
    "gopuff", "shipt", "seatgeek", "gametime", "grubhub", "kickstarter",
    "patreon", "eventbrite", "gofundme",
    // Crypto
    "kraken", "gemini", "opensea", "dapperlabs",
    // SaaS
    "affinity", "bench", "circle", "clearbit", "cultureamp", "envoy",
    "maven", "outreach", "postscript", "qualtrics", "usertesting", "whatnot",
    "workato", "yotpo", "snap", "thumbtack",
];

pub const ASHBY_BOARDS: &[&str] = &[
    "notion", "linear", "retool", "dbt-labs", "scale-ai", "cohere",
    "perplexity", "mistral", "anthropic",
    "brex", "ramp", "mercury", "airbase", "puzzle", "lattice", "rippling",
    "deel", "gusto",
    "vercel", "supabase", "planetscale", "railway", "posthog", "metabase",
    "clerk", "neon", "turso", "convex", "upstash",
    "warp", "zed", "cursor", "codeium", "sourcegraph", "coder",
    "hex", "mode", "starburst", "firebolt", "baseten", "modal",
    "mintlify", "gitbook", "readme",
    "incident", "rootly", "firehydrant",
    "census", "hightouch", "growthbook", "statsig", "launchdarkly",
    "tinybird", "clickhouse", "motherduck", "inngest", "trigger", "windmill",
    "secureframe", "drata", "glean", "workos", "stytch",
];

pub const WORKABLE_BOARDS: &[&str] = &[
    "intercom", "typeform", "taxjar", "pipedrive", "hotjar", "calendly",
    "airtable", "productboard", "pendo", "appsflyer", "contentsquare",
    "adjust", "branch", "singular", "algolia", "meilisearch", "typesense",
    "hasura", "fauna", "deno", "estuary", "mage", "prefect", "dagster",
    "astronomer", "atlan", "onfido", "veriff", "sumsub", "persona",
];

pub const SMARTRECRUITERS_BOARDS: &[&str] = &[
    "mcdonalds", "visa", "starbucks", "adobe", "bosch", "siemens",
    "deloitte", "kpmg", "pwc", "thoughtworks", "n26", "delivery-hero",
    "checkout-com", "adyen", "mollie", "servicenow",
];

pub const BAMBOOHR_BOARDS: &[&str] = &[
    "palantir", "qualtrics", "divvy", "olo", "nearmap", "lucidchart",
    "familysearch", "healthequity", "domo", "chatmeter", "businessq",
];

/// Workday career sites, POST-search based. A few entries point at other
/// ATSes for historical reasons; the adapter skips anything that is not a
/// `myworkdayjobs.com` host.
pub const WORKDAY_COMPANIES: &[(&str, &str)] = &[
    ("NVIDIA", "https://nvidia.wd5.myworkdayjobs.com/NVIDIAExternalCareerSite"),
    ("Microsoft", "https://microsoft.wd5.myworkdayjobs.com/External"),
    ("Apple", "https://apple.wd1.myworkdayjobs.com/en-US/apple_external_application"),
    ("Walmart", "https://walmart.wd5.myworkdayjobs.com/WalmartExternal"),
    ("IBM", "https://ibm.wd12.myworkdayjobs.com/en-US/External"),
    ("Salesforce", "https://salesforce.wd1.myworkdayjobs.com/External_Career_Site"),
    ("Cisco", "https://cisco.wd5.myworkdayjobs.com/External"),
    ("Intel", "https://intel.wd1.myworkdayjobs.com/External"),
    ("AMD", "https://amd.wd1.myworkdayjobs.com/External"),
    ("Qualcomm", "https://qualcomm.wd5.myworkdayjobs.com/External"),
    ("Texas Instruments", "https://ti.wd5.myworkdayjobs.com/TIU_Candidates_External"),
    ("Boeing", "https://boeing.wd1.myworkdayjobs.com/EXTERNAL_CAREERS"),
    ("Lockheed Martin", "https://lmco.wd5.myworkdayjobs.com/External"),
    ("RTX", "https://rtx.wd1.myworkdayjobs.com/RTX"),
    ("Northrop Grumman", "https://ngc.wd1.myworkdayjobs.com/NGC_External_Career_Site"),
    ("HP", "https://hp.wd5.myworkdayjobs.com/ExternalCareerSite"),
    ("Dell", "https://dell.wd1.myworkdayjobs.com/External"),
    ("Workday", "https://workday.wd5.myworkdayjobs.com/Workday"),
    ("SAP", "https://sap.wd3.myworkdayjobs.com/SAP"),
    ("Intuit", "https://intuit.wd1.myworkdayjobs.com/jobs"),
    ("PayPal", "https://paypal.wd1.myworkdayjobs.com/jobs"),
    ("eBay", "https://ebay.wd5.myworkdayjobs.com/apply"),
    ("Snap", "https://wd1.myworkdayjobs.com/en-US/snap"),
    ("ServiceNow", "https://jobs.smartrecruiters.com/ServiceNow"),
    ("Netflix", "https://jobs.lever.co/netflix"),
];

/// Entry-level-focused keyword set for the Workday POST search.
pub const WORKDAY_KEYWORDS: &[&str] = &[
    "Software Engineer",
    "New Grad",
    "Entry Level Engineer",
    "Data Engineer",
    "Analytics Engineer",
    "Data Scientist",
    "Data Analyst",
    "Business Analyst",
    "Business Intelligence Analyst",
    "Product Analyst",
    "Operations Analyst",
    "Machine Learning Engineer",
    "Cloud Engineer",
    "Platform Engineer",
];

pub const ADZUNA_QUERIES: &[&str] = &[
    "software engineer new grad",
    "backend engineer entry level",
    "data engineer junior",
    "machine learning engineer entry level",
    "cloud engineer new grad",
    "full stack developer entry level",
    "sde entry level",
];

/// LinkedIn query matrix, broad to narrow. Shared by the guest API and the
/// headful scraper.
pub const LINKEDIN_QUERIES: &[&str] = &[
    // Core SWE
    "new grad software engineer",
    "entry level software engineer",
    "software engineer I",
    "SDE 1",
    "junior software engineer",
    "associate software engineer",
    // Specializations
    "backend engineer new grad",
    "frontend engineer entry level",
    "full stack engineer entry level",
    // Data engineering
    "data engineer entry level",
    "data engineer new grad",
    "analytics engineer entry level",
    // Data science / analytics
    "data scientist new grad",
    "data analyst entry level",
    "data analyst new grad",
    "business analyst entry level",
    "business intelligence analyst entry level",
    "BI analyst new grad",
    "product analyst new grad",
    "operations analyst entry level",
    // ML / AI
    "AI engineer entry level",
    "machine learning engineer new grad",
    // Infra / cloud
    "cloud engineer new grad",
    "DevOps engineer entry level",
    "platform engineer new grad",
    "mobile engineer entry level",
    // Catch-all
    "early career engineer",
    "new graduate engineer",
];

/// Simplify browser search queries.
pub const SIMPLIFY_QUERIES: &[&str] = &[
    "software engineer new grad",
    "SDE 1",
    "junior software engineer",
    "associate software engineer",
    "backend engineer entry level",
    "frontend engineer entry level",
    "full stack engineer new grad",
    "data engineer entry level",
    "data engineer new grad",
    "analytics engineer entry level",
    "data scientist new grad",
    "data analyst entry level",
    "business analyst entry level",
    "business intelligence analyst entry level",
    "product analyst new grad",
    "operations analyst entry level",
    "machine learning engineer entry level",
    "AI engineer new grad",
    "cloud engineer entry level",
    "DevOps engineer entry level",
    "platform engineer new grad",
    "mobile engineer entry level",
];

/// Jobright search matrix: (query, experience-level parameter).
pub const JOBRIGHT_QUERIES: &[(&str, &str)] = &[
    ("Software Engineer Entry Level", "Entry+Level"),
    ("Software Engineer New Grad", "Entry+Level"),
    ("Backend Engineer Entry Level", "Entry+Level"),
    ("Full Stack Engineer Entry Level", "Entry+Level"),
    ("AI Engineer New Grad", "Entry+Level"),
    ("Machine Learning Engineer Entry", "Entry+Level"),
    ("Data Engineer Entry Level", "Entry+Level"),
    ("Cloud Engineer Entry Level", "Entry+Level"),
    ("New Grad SWE", "Entry+Level"),
    ("Junior Software Engineer", "Junior"),
    ("Junior Backend Engineer", "Junior"),
    ("SDE 1", "Entry+Level"),
];

/// Curated new-grad JSON feeds (primary pair).
pub const JSON_FEEDS: &[&str] = &[
    "https://raw.githubusercontent.com/SimplifyJobs/New-Grad-Positions/dev/src/data/positions.json",
    "https://raw.githubusercontent.com/speedyapply/2026-SWE-College-Jobs/main/src/data/positions.json",
];

/// Simplify-style JSON feeds for the multi-repo fallback: (url, label).
pub const SIMPLIFY_REPO_FEEDS: &[(&str, &str)] = &[
    (
        "https://raw.githubusercontent.com/SimplifyJobs/New-Grad-Positions/dev/src/data/positions.json",
        "simplify-new-grad",
    ),
    (
        "https://raw.githubusercontent.com/speedyapply/2026-SWE-College-Jobs/main/src/data/positions.json",
        "speedyapply-2026",
    ),
    (
        "https://raw.githubusercontent.com/vanshb03/New-Grad-2026/main/src/data/positions.json",
        "vanshb-2026",
    ),
    (
        "https://raw.githubusercontent.com/coderQuad/New-Grad-Hires/main/src/data/positions.json",
        "coderquad",
    ),
    (
        "https://raw.githubusercontent.com/ReaVNaiL/New-Grad-2024/main/src/data/positions.json",
        "reavnail-2024",
    ),
    (
        "https://raw.githubusercontent.com/Ouckah/Summer2025-Internships/dev/src/data/positions.json",
        "ouckah-2025-full",
    ),
    (
        "https://raw.githubusercontent.com/cvrve/New-Grad-2025/dev/src/data/positions.json",
        "cvrve-2025",
    ),
    (
        "https://raw.githubusercontent.com/AkazaAkane/product-manager-jobs-fall-2024/main/src/data/positions.json",
        "pm-jobs",
    ),
];

/// Community markdown lists: (raw url, label).
pub const MARKDOWN_FEEDS: &[(&str, &str)] = &[
    (
        "https://raw.githubusercontent.com/speedyapply/2026-SWE-College-Jobs/main/NEW_GRAD_USA.md",
        "speedyapply-2026",
    ),
    (
        "https://raw.githubusercontent.com/vanshb03/New-Grad-2026/main/README.md",
        "vanshb-2026",
    ),
    (
        "https://raw.githubusercontent.com/SimplifyJobs/New-Grad-Positions/dev/README.md",
        "simplify-ng",
    ),
    (
        "https://raw.githubusercontent.com/ReaVNaiL/New-Grad-2024/main/README.md",
        "reavnail",
    ),
    (
        "https://raw.githubusercontent.com/pittcsc/Summer2024-Internships/dev/README.md",
        "pittcsc",
    ),
    (
        "https://raw.githubusercontent.com/Ouckah/Summer2025-Internships/dev/README.md",
        "ouckah",
    ),
];
