//! The conformance rule catalog.
//!
//! Rules live in two registries:
//!
//! - **Local rules** are evaluated against every line of every theme file
//!   and may fire any number of times.
//! - **Required rules** are evaluated once per theme: each one fires at most
//!   once, as an absence finding, when no file anywhere in the theme
//!   satisfies it.
//!
//! Both registries are ordered slices, never maps, so rule evaluation and
//! report output stay deterministic. The catalog is compiled once per
//! process and is read-only afterwards; a rule whose pattern fails to
//! compile is skipped with a warning so the rest of the catalog still loads.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::findings::{Category, Severity};

// ============================================================
// Pattern rules
// ============================================================

/// Constraint on the character immediately preceding a raw regex match.
///
/// The regex engine has no lookbehind, so rules that need one carry a guard
/// instead; the scanner rejects any match whose preceding character the
/// guard disallows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    None,
    /// Reject a match preceded by `[A-Za-z0-9_.]`: the construct is part of
    /// a longer identifier or a method/property access.
    NotAfterIdentOrDot,
    /// Reject a match preceded by `[A-Za-z0-9_]`: the construct is part of
    /// a longer identifier (e.g. `exec` inside `my_exec`).
    NotAfterWord,
}

impl Guard {
    pub fn allows(self, preceding: Option<char>) -> bool {
        match self {
            Guard::None => true,
            Guard::NotAfterIdentOrDot => {
                !matches!(preceding, Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '.')
            }
            Guard::NotAfterWord => {
                !matches!(preceding, Some(c) if c.is_ascii_alphanumeric() || c == '_')
            }
        }
    }
}

/// Constraint on the text following a raw regex match, for rules that would
/// need a negative lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Follow {
    None,
    /// Reject a match followed (after optional spaces) by a closing paren;
    /// used to let `echo $var` fire while `foo(echo $var)`-style argument
    /// positions stay quiet.
    NotBeforeCloseParen,
}

impl Follow {
    pub fn allows(self, rest_of_line: &str) -> bool {
        match self {
            Follow::None => true,
            Follow::NotBeforeCloseParen => !rest_of_line.trim_start().starts_with(')'),
        }
    }
}

/// A single conformance rule: a pattern plus the finding it produces.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub pattern: &'static str,
    pub case_insensitive: bool,
    pub guard: Guard,
    pub follow: Follow,
    pub message: &'static str,
    pub severity: Severity,
    pub category: Category,
    pub replacement: Option<&'static str>,
}

/// Shorthand for the common case: case-sensitive, no guards.
const fn rule(
    pattern: &'static str,
    message: &'static str,
    severity: Severity,
    category: Category,
) -> PatternRule {
    PatternRule {
        pattern,
        case_insensitive: false,
        guard: Guard::None,
        follow: Follow::None,
        message,
        severity,
        category,
        replacement: None,
    }
}

const fn rule_ci(
    pattern: &'static str,
    message: &'static str,
    severity: Severity,
    category: Category,
) -> PatternRule {
    PatternRule {
        pattern,
        case_insensitive: true,
        guard: Guard::None,
        follow: Follow::None,
        message,
        severity,
        category,
        replacement: None,
    }
}

/// A rule that carries a suggested replacement.
const fn rule_fix(
    pattern: &'static str,
    message: &'static str,
    severity: Severity,
    category: Category,
    replacement: &'static str,
) -> PatternRule {
    PatternRule {
        pattern,
        case_insensitive: false,
        guard: Guard::None,
        follow: Follow::None,
        message,
        severity,
        category,
        replacement: Some(replacement),
    }
}

// ============================================================
// Local rules (checked per line, per file)
// ============================================================

/// Malicious code, forbidden functions, unescaped output, deprecated APIs,
/// plugin-territory functionality, CDN usage, raw script/style tags.
/// Ordered; the scanner evaluates them in exactly this order.
pub const LOCAL_RULES: &[PatternRule] = &[
    // --- Bad things: malicious code and forbidden functions ---
    PatternRule {
        pattern: r"eval\s?\(",
        case_insensitive: true,
        guard: Guard::NotAfterIdentOrDot,
        follow: Follow::None,
        message: "eval() is not allowed",
        severity: Severity::Error,
        category: Category::Security,
        replacement: None,
    },
    PatternRule {
        pattern: r"(popen|proc_open|exec|shell_exec|system|passthru)\(",
        case_insensitive: false,
        guard: Guard::NotAfterWord,
        follow: Follow::None,
        message: "PHP system calls are often disabled by server admins and should not be in themes",
        severity: Severity::Error,
        category: Category::Security,
        replacement: None,
    },
    rule(
        r"base64_decode",
        "base64_decode() is not allowed",
        Severity::Error,
        Category::Security,
    ),
    rule_ci(
        r"pub-[0-9]{16}",
        "Google advertising code detected",
        Severity::Error,
        Category::Security,
    ),
    rule_ci(
        r"sharesale\.com",
        "ShareSale affiliate link detected",
        Severity::Error,
        Category::Security,
    ),
    rule(
        r"ini_set\(",
        "Changing server settings is not allowed. Use wp_raise_memory_limit() instead",
        Severity::Warning,
        Category::Security,
    ),
    rule(
        r"uname\s?\(",
        "uname() is not allowed",
        Severity::Error,
        Category::Security,
    ),
    rule(
        r"getmyuid\s?\(",
        "getmyuid() is not allowed",
        Severity::Error,
        Category::Security,
    ),
    rule(
        r"getmypid\s?\(",
        "getmypid() is not allowed",
        Severity::Error,
        Category::Security,
    ),
    rule(
        r"<\?php\s+@",
        "Error suppression with @ is not recommended",
        Severity::Warning,
        Category::Security,
    ),
    rule(
        r"\$_(GET|POST|REQUEST|COOKIE|SERVER)\[",
        "Direct access to superglobals is not recommended. Sanitize and validate all input data",
        Severity::Warning,
        Category::Security,
    ),
    // --- Escaping: unescaped dynamic output ---
    PatternRule {
        pattern: r"echo\s+\$[a-zA-Z_][a-zA-Z0-9_]*",
        case_insensitive: false,
        guard: Guard::None,
        follow: Follow::NotBeforeCloseParen,
        message: "Found echo $. Possible data validation issues found. All dynamic data must be correctly escaped for the context where it is rendered",
        severity: Severity::Warning,
        category: Category::Escaping,
        replacement: None,
    },
    rule(
        r#"<\?=\s*\$[a-zA-Z_][a-zA-Z0-9_]*"#,
        "Short echo tag with unescaped variable. Use esc_html() or esc_attr()",
        Severity::Warning,
        Category::Escaping,
    ),
    rule(
        r">\s*<\?php\s+echo\s+esc_attr\(",
        "Found ><?php echo esc_attr(. Only use esc_attr() inside HTML attributes. Use esc_html() between HTML tags. A manual review is needed",
        Severity::Warning,
        Category::Escaping,
    ),
    // --- Deprecated WordPress APIs ---
    rule_fix(
        r#"\bget_bloginfo\s*\(\s*['"]url['"]\s*\)"#,
        "get_bloginfo('url') is deprecated. Use home_url() instead",
        Severity::Warning,
        Category::Deprecated,
        "home_url()",
    ),
    rule_fix(
        r#"\bget_bloginfo\s*\(\s*['"]wpurl['"]\s*\)"#,
        "get_bloginfo('wpurl') is deprecated. Use site_url() instead",
        Severity::Warning,
        Category::Deprecated,
        "site_url()",
    ),
    rule_fix(
        r#"\bbloginfo\s*\(\s*['"]url['"]\s*\)"#,
        "bloginfo('url') is deprecated. Use echo home_url() instead",
        Severity::Warning,
        Category::Deprecated,
        "echo home_url()",
    ),
    rule_fix(
        r#"\bbloginfo\s*\(\s*['"]wpurl['"]\s*\)"#,
        "bloginfo('wpurl') is deprecated. Use echo site_url() instead",
        Severity::Warning,
        Category::Deprecated,
        "echo site_url()",
    ),
    rule_fix(
        r"\bwp_get_post_tags\s*\(",
        "wp_get_post_tags() is deprecated. Use get_the_tags() instead",
        Severity::Warning,
        Category::Deprecated,
        "get_the_tags()",
    ),
    rule_fix(
        r"\bwp_get_post_categories\s*\(",
        "wp_get_post_categories() is deprecated. Use get_the_category() instead",
        Severity::Warning,
        Category::Deprecated,
        "get_the_category()",
    ),
    rule(
        r"\bscreen_icon\s*\(",
        "screen_icon() is deprecated since WordPress 3.8",
        Severity::Warning,
        Category::Deprecated,
    ),
    rule_fix(
        r"\bget_currentuserinfo\s*\(",
        "get_currentuserinfo() is deprecated. Use wp_get_current_user() instead",
        Severity::Warning,
        Category::Deprecated,
        "wp_get_current_user()",
    ),
    rule_fix(
        r"\bget_current_theme\s*\(",
        "get_current_theme() is deprecated. Use wp_get_theme() instead",
        Severity::Warning,
        Category::Deprecated,
        "wp_get_theme()",
    ),
    rule_fix(
        r"\bget_theme_data\s*\(",
        "get_theme_data() is deprecated. Use wp_get_theme() instead",
        Severity::Warning,
        Category::Deprecated,
        "wp_get_theme()",
    ),
    // --- Translation calls missing the text domain parameter ---
    rule(
        r#"__\s*\(\s*['"][^'"]+['"]\s*\)"#,
        "Translation function __() is missing text domain parameter",
        Severity::Warning,
        Category::TextDomain,
    ),
    rule(
        r#"_e\s*\(\s*['"][^'"]+['"]\s*\)"#,
        "Translation function _e() is missing text domain parameter",
        Severity::Warning,
        Category::TextDomain,
    ),
    rule(
        r#"_x\s*\(\s*['"][^'"]+['"]\s*,\s*['"][^'"]+['"]\s*\)"#,
        "Translation function _x() is missing text domain parameter",
        Severity::Warning,
        Category::TextDomain,
    ),
    rule(
        r#"_n\s*\(\s*['"][^'"]+['"]\s*,\s*['"][^'"]+['"]\s*,"#,
        "Translation function _n() is missing text domain parameter",
        Severity::Warning,
        Category::TextDomain,
    ),
    rule(
        r#"_nx\s*\(\s*['"][^'"]+['"]\s*,\s*['"][^'"]+['"]\s*,"#,
        "Translation function _nx() is missing text domain parameter",
        Severity::Warning,
        Category::TextDomain,
    ),
    // --- Plugin territory ---
    rule(
        r"register_post_type\s*\(",
        "The theme appears to use register_post_type(). This is plugin territory functionality",
        Severity::Warning,
        Category::PluginTerritory,
    ),
    rule(
        r"register_taxonomy\s*\(",
        "The theme appears to use register_taxonomy(). This is plugin territory functionality",
        Severity::Warning,
        Category::PluginTerritory,
    ),
    rule(
        r"add_shortcode\s*\(",
        "The theme appears to use add_shortcode(). Custom post-content shortcodes are plugin territory",
        Severity::Warning,
        Category::PluginTerritory,
    ),
    rule(
        r"wp_mail\s*\(",
        "The theme appears to use wp_mail(). Sending emails is plugin territory",
        Severity::Warning,
        Category::PluginTerritory,
    ),
    rule(
        r"add_role\s*\(",
        "The theme appears to use add_role(). User roles and capabilities are plugin territory",
        Severity::Warning,
        Category::PluginTerritory,
    ),
    // --- CDN assets that must be enqueued or hosted locally ---
    rule_ci(
        r"fonts\.googleapis\.com",
        "Google Fonts should be enqueued using wp_enqueue_style()",
        Severity::Warning,
        Category::Cdn,
    ),
    rule_ci(
        r"code\.jquery\.com",
        "jQuery from CDN detected. Use WordPress bundled jQuery instead",
        Severity::Warning,
        Category::Cdn,
    ),
    rule_ci(
        r"ajax\.googleapis\.com",
        "Google CDN detected. Use WordPress bundled libraries instead",
        Severity::Warning,
        Category::Cdn,
    ),
    rule_ci(
        r"cdn\.jsdelivr\.net",
        "jsDelivr CDN detected. Host files locally instead",
        Severity::Warning,
        Category::Cdn,
    ),
    rule_ci(
        r"cdnjs\.cloudflare\.com",
        "Cloudflare CDN detected. Host files locally instead",
        Severity::Warning,
        Category::Cdn,
    ),
    // --- Raw script/style tags and hardcoded forms ---
    rule_ci(
        r"<script[^>]*src=",
        "<script> tag found. Use wp_enqueue_script() instead",
        Severity::Warning,
        Category::Enqueue,
    ),
    rule_ci(
        r#"<link[^>]*rel=['"]stylesheet['"]"#,
        "<link rel='stylesheet'> tag found. Use wp_enqueue_style() instead",
        Severity::Warning,
        Category::Enqueue,
    ),
    rule_ci(
        r#"role=['"]search['"]"#,
        "role=\"search\" was found. Use get_search_form() instead of hard coding forms. Otherwise, the form can not be filtered",
        Severity::Warning,
        Category::BestPractices,
    ),
    // --- Deprecated widget constructor ---
    rule(
        r"class\s+\w+\s+extends\s+WP_Widget\s*\{[^}]*function\s+\w+\s*\(",
        "Deprecated widget constructor found. Use __construct() instead of PHP4 style constructor",
        Severity::Warning,
        Category::Deprecated,
    ),
    // --- Deregistering bundled libraries ---
    rule(
        r#"wp_deregister_script\s*\(\s*['"]jquery['"]\s*\)"#,
        "Deregistering jQuery is not allowed. Use WordPress bundled jQuery",
        Severity::Warning,
        Category::BestPractices,
    ),
    // --- Menus without a theme_location ---
    rule(
        r"wp_nav_menu\s*\([^)]*\)",
        "A menu without a theme_location was found. You must manually check if the theme_location is included",
        Severity::Warning,
        Category::BestPractices,
    ),
    // --- Incompatibly licensed assets ---
    rule_ci(
        r"flaticon",
        "Found a reference to flaticon. Assets from this website does not use a license that is compatible with GPL",
        Severity::Error,
        Category::Licensing,
    ),
];

// ============================================================
// Required rules (checked once per theme)
// ============================================================

/// Constructs every theme must (`Error`) or should (`Info`) contain
/// somewhere. A required rule fires as an absence finding on the theme's
/// home file when no theme file matches it.
pub const REQUIRED_RULES: &[PatternRule] = &[
    rule(
        r"register_nav_menus?\s*\(",
        "REQUIRED: register_nav_menu() or register_nav_menus()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]post-thumbnails['"]"#,
        "REQUIRED: add_theme_support('post-thumbnails')",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]automatic-feed-links['"]"#,
        "REQUIRED: add_theme_support('automatic-feed-links')",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]title-tag['"]"#,
        "REQUIRED: add_theme_support('title-tag')",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"register_sidebar\s*\(",
        "REQUIRED: register_sidebar()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"wp_enqueue_style\s*\(",
        "REQUIRED: wp_enqueue_style() for CSS files",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"wp_enqueue_script\s*\(",
        "REQUIRED: wp_enqueue_script() for JavaScript files",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r#"add_action\s*\(\s*['"]wp_enqueue_scripts['"]"#,
        "REQUIRED: add_action('wp_enqueue_scripts', ...)",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"comments_template\s*\(",
        "REQUIRED: comments_template()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"wp_list_comments\s*\(",
        "REQUIRED: wp_list_comments()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"wp_head\s*\(\s*\)",
        "REQUIRED: wp_head()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"wp_footer\s*\(\s*\)",
        "REQUIRED: wp_footer()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"body_class\s*\(\s*\)",
        "REQUIRED: body_class()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"wp_link_pages\s*\(",
        "REQUIRED: wp_link_pages()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"post_class\s*\(",
        "REQUIRED: post_class()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"comment_form\s*\(",
        "REQUIRED: comment_form()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"posts_nav_link\s*\(",
        "REQUIRED: posts_nav_link() or paginate_links()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"paginate_links\s*\(",
        "REQUIRED: paginate_links()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"the_posts_pagination\s*\(",
        "REQUIRED: the_posts_pagination()",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"\$content_width\s*=",
        "REQUIRED: $content_width must be defined",
        Severity::Error,
        Category::Required,
    ),
    rule(
        r"register_block_style\s*\(",
        "RECOMMENDED: No reference to register_block_style was found in the theme. Theme authors are encouraged to implement new block styles as a transition to block themes",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r"register_block_pattern\s*\(",
        "RECOMMENDED: No reference to register_block_pattern was found in the theme. Theme authors are encouraged to implement custom block patterns as a transition to block themes",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]wp-block-styles['"]"#,
        "RECOMMENDED: No reference to add_theme_support( \"wp-block-styles\" ) was found in the theme. It is recommended that the theme implement this functionality",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]responsive-embeds['"]"#,
        "RECOMMENDED: No reference to add_theme_support( \"responsive-embeds\" ) was found in the theme. It is recommended that the theme implement this functionality",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]html5['"]"#,
        "RECOMMENDED: No reference to add_theme_support( \"html5\", $args ) was found in the theme. It is strongly recommended that the theme implement this functionality",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]custom-background['"]"#,
        "RECOMMENDED: No reference to add_theme_support( \"custom-background\", $args ) was found in the theme. If the theme uses background images or solid colors for the background, then it is recommended that the theme implement this functionality",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]align-wide['"]"#,
        "RECOMMENDED: No reference to add_theme_support( \"align-wide\" ) was found in the theme. It is recommended that the theme implement this functionality",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r"add_editor_style\s*\(",
        "RECOMMENDED: No reference to add_editor_style() was found in the theme. It is recommended that the theme implement editor styling, so as to make the editor content match the resulting post output in the theme, for a better user experience",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]custom-header['"]"#,
        "RECOMMENDED: No reference to add_theme_support( \"custom-header\", $args ) was found in the theme",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]custom-logo['"]"#,
        "RECOMMENDED: No reference to add_theme_support( \"custom-logo\" ) was found in the theme",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r"the_custom_logo\s*\(",
        "RECOMMENDED: No reference to the_custom_logo() was found",
        Severity::Info,
        Category::Recommended,
    ),
    rule(
        r#"add_theme_support\s*\(\s*['"]customize-selective-refresh-widgets['"]"#,
        "RECOMMENDED: No reference to add_theme_support( \"customize-selective-refresh-widgets\" ) was found",
        Severity::Info,
        Category::Recommended,
    ),
];

// ============================================================
// Compiled catalog
// ============================================================

/// A rule with its pattern compiled, ready for scanning.
#[derive(Debug)]
pub struct CompiledRule {
    pub regex: Regex,
    pub guard: Guard,
    pub follow: Follow,
    pub message: &'static str,
    pub severity: Severity,
    pub category: Category,
    pub replacement: Option<&'static str>,
}

impl CompiledRule {
    fn compile(rule: &PatternRule) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(rule.pattern)
            .case_insensitive(rule.case_insensitive)
            .build()?;
        Ok(Self {
            regex,
            guard: rule.guard,
            follow: rule.follow,
            message: rule.message,
            severity: rule.severity,
            category: rule.category,
            replacement: rule.replacement,
        })
    }
}

/// The compiled rule catalog. Process-wide, built once, safe for
/// unsynchronized concurrent reads.
#[derive(Debug)]
pub struct Catalog {
    local: Vec<CompiledRule>,
    required: Vec<CompiledRule>,
    skipped: usize,
}

impl Catalog {
    /// Compile the static rule tables, skipping any rule whose pattern does
    /// not compile. One bad rule must never take the catalog down.
    fn load() -> Self {
        let mut skipped = 0;
        let mut compile_all = |rules: &[PatternRule]| -> Vec<CompiledRule> {
            rules
                .iter()
                .filter_map(|rule| match CompiledRule::compile(rule) {
                    Ok(compiled) => Some(compiled),
                    Err(err) => {
                        skipped += 1;
                        eprintln!(
                            "warning: skipping rule with invalid pattern {:?}: {}",
                            rule.pattern, err
                        );
                        None
                    }
                })
                .collect()
        };

        let local = compile_all(LOCAL_RULES);
        let required = compile_all(REQUIRED_RULES);

        Self {
            local,
            required,
            skipped,
        }
    }

    /// The shared process-wide catalog.
    pub fn global() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(Catalog::load)
    }

    /// Local rules in evaluation order.
    pub fn local_rules(&self) -> &[CompiledRule] {
        &self.local
    }

    /// Required rules in evaluation order.
    pub fn required_rules(&self) -> &[CompiledRule] {
        &self.required
    }

    /// Number of rules dropped because their pattern failed to compile.
    pub fn skipped_rules(&self) -> usize {
        self.skipped
    }
}
