//! Textual scanning of Terraform code.
//!
//! Nothing here parses HCL. Constructs are recognised by pattern, and block
//! bodies are delimited by brace depth. The validator and the security
//! analyzer both read code through [`CodeScan`] so they agree on what counts
//! as a security group, a resource block, or a literal credential.

use once_cell::sync::Lazy;
use regex::Regex;

static RESOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"resource\s+"([^"]+)"\s+"([^"]+)""#).unwrap());

static TERRAFORM_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*terraform\s*\{").unwrap());

static PROVIDER: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?m)^\s*provider\s+"[^"]+""#).unwrap());

static VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?m)^\s*variable\s+"[^"]+""#).unwrap());

static INGRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bingress\s*\{").unwrap());

static CREDENTIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b([a-z0-9_]*(?:password|secret|access_key|secret_key))\s*=\s*["']([^"']+)["']"#)
        .unwrap()
});

static OPEN_CIDR: Lazy<Regex> = Lazy::new(|| Regex::new(r"0\.0\.0\.0\s*/\s*0|::/0").unwrap());

static FROM_PORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfrom_port\s*=\s*(\d+)").unwrap());

static TO_PORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bto_port\s*=\s*(\d+)").unwrap());

static ALL_PROTOCOLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bprotocol\s*=\s*"(?:-1|all)""#).unwrap());

/// Remote administration ports: SSH and RDP.
pub const ADMIN_PORTS: &[u32] = &[22, 3389];

static TLS_PORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b443\b").unwrap());

static DELETION_PROTECTION_OFF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"enable_deletion_protection\s*=\s*false").unwrap());

/// Instance sizes that qualify for the free tier.
pub const FREE_TIER_SIZES: &[&str] = &["t2.micro", "t3.micro"];

/// One `resource "<type>" "<name>" { ... }` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBlock<'a> {
    pub resource_type: &'a str,
    pub name: &'a str,
    /// Text between the opening brace and its matching close. Runs to the end
    /// of the input when the block is never closed.
    pub body: &'a str,
}

/// Pre-computed view over one code text.
#[derive(Debug, Clone)]
pub struct CodeScan<'a> {
    code: &'a str,
    lower: String,
    open_braces: usize,
    close_braces: usize,
    resources: Vec<ResourceBlock<'a>>,
}

impl<'a> CodeScan<'a> {
    pub fn new(code: &'a str) -> Self {
        let resources = RESOURCE
            .captures_iter(code)
            .map(|caps| {
                let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
                ResourceBlock {
                    resource_type: caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
                    name: caps.get(2).map(|m| m.as_str()).unwrap_or_default(),
                    body: block_body(code, whole),
                }
            })
            .collect();

        Self {
            code,
            lower: code.to_lowercase(),
            open_braces: code.matches('{').count(),
            close_braces: code.matches('}').count(),
            resources,
        }
    }

    pub fn code(&self) -> &'a str {
        self.code
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn open_braces(&self) -> usize {
        self.open_braces
    }

    pub fn close_braces(&self) -> usize {
        self.close_braces
    }

    pub fn braces_balanced(&self) -> bool {
        self.open_braces == self.close_braces
    }

    pub fn resources(&self) -> &[ResourceBlock<'a>] {
        &self.resources
    }

    /// Occurrences of `resource "<type>" "<name>"`.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn resource(&self, resource_type: &str, name: &str) -> Option<&ResourceBlock<'a>> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.name == name)
    }

    pub fn resources_of_type<'s>(
        &'s self,
        resource_type: &'s str,
    ) -> impl Iterator<Item = &'s ResourceBlock<'a>> + 's {
        self.resources
            .iter()
            .filter(move |r| r.resource_type == resource_type)
    }

    pub fn has_terraform_block(&self) -> bool {
        TERRAFORM_BLOCK.is_match(self.code)
    }

    pub fn has_provider(&self) -> bool {
        PROVIDER.is_match(self.code)
    }

    pub fn has_variables(&self) -> bool {
        VARIABLE.is_match(self.code)
    }

    pub fn has_security_group(&self) -> bool {
        self.lower.contains("security_group")
    }

    pub fn has_network_isolation(&self) -> bool {
        self.lower.contains("vpc")
    }

    pub fn has_encryption(&self) -> bool {
        self.lower.contains("encrypt") || self.lower.contains("kms")
    }

    pub fn has_tls(&self) -> bool {
        self.lower.contains("https")
            || self.lower.contains("certificate")
            || self.lower.contains("ssl")
            || TLS_PORT.is_match(self.code)
    }

    pub fn has_load_balancer(&self) -> bool {
        self.resources
            .iter()
            .any(|r| r.resource_type == "aws_lb" || r.resource_type == "aws_alb")
    }

    pub fn deletion_protection_disabled(&self) -> bool {
        DELETION_PROTECTION_OFF.is_match(self.code)
    }

    /// Keys assigned a quoted literal rather than a variable reference.
    pub fn literal_credentials(&self) -> Vec<&'a str> {
        CREDENTIAL
            .captures_iter(self.code)
            .filter(|caps| !caps[2].trim_start().starts_with("${"))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Bodies of every `ingress { ... }` block.
    pub fn ingress_blocks(&self) -> Vec<&'a str> {
        INGRESS
            .find_iter(self.code)
            .map(|m| block_body(self.code, m.end() - 1))
            .collect()
    }

    /// Ingress blocks open to any source whose port range covers SSH or RDP.
    pub fn open_admin_ingress(&self) -> Vec<&'a str> {
        self.ingress_blocks()
            .into_iter()
            .filter(|body| OPEN_CIDR.is_match(body) && exposes_admin_port(body))
            .collect()
    }

    /// Free-tier sizes mentioned as quoted literals.
    pub fn free_tier_sizes(&self) -> Vec<&'static str> {
        FREE_TIER_SIZES
            .iter()
            .copied()
            .filter(|size| self.code.contains(&format!("\"{}\"", size)))
            .collect()
    }
}

/// Whether an ingress body admits an admin port. Protocol `-1` opens every
/// port regardless of the declared range.
fn exposes_admin_port(body: &str) -> bool {
    if ALL_PROTOCOLS.is_match(body) {
        return true;
    }
    let read = |re: &Regex| re.captures(body).and_then(|caps| caps[1].parse::<u32>().ok());
    let (from, to) = match (read(&FROM_PORT), read(&TO_PORT)) {
        (Some(from), Some(to)) => (from.min(to), from.max(to)),
        (Some(port), None) | (None, Some(port)) => (port, port),
        (None, None) => return false,
    };
    ADMIN_PORTS.iter().any(|p| (from..=to).contains(p))
}

/// Slice the body of the block whose opening brace is at or after `from`.
fn block_body(code: &str, from: usize) -> &str {
    let Some(offset) = code[from..].find('{') else {
        return "";
    };
    let start = from + offset + 1;
    let mut depth = 1usize;
    for (i, c) in code[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return &code[start..start + i];
                }
            }
            _ => {}
        }
    }
    &code[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
resource "aws_security_group" "web" {
  ingress {
    from_port   = 22
    to_port     = 22
    cidr_blocks = ["0.0.0.0/0"]
  }
  ingress {
    from_port   = 80
    to_port     = 80
    cidr_blocks = ["0.0.0.0/0"]
  }
}

resource "aws_instance" "db" {
  subnet_id = aws_subnet.private.id
  tags = {
    Engine = "mysql"
  }
}
"#;

    #[test]
    fn test_resource_blocks_capture_nested_bodies() {
        let scan = CodeScan::new(SAMPLE);
        assert_eq!(scan.resource_count(), 2);

        let db = scan.resource("aws_instance", "db").unwrap();
        assert!(db.body.contains("aws_subnet.private.id"));
        assert!(db.body.contains("Engine"));
        assert!(!db.body.contains("ingress"));
    }

    #[test]
    fn test_open_admin_ingress() {
        let scan = CodeScan::new(SAMPLE);
        assert_eq!(scan.ingress_blocks().len(), 2);
        let open = scan.open_admin_ingress();
        assert_eq!(open.len(), 1);
        assert!(open[0].contains("from_port   = 22"));
    }

    #[test]
    fn test_restricted_ssh_is_not_open() {
        let code = r#"ingress {
  from_port   = 22
  cidr_blocks = [var.admin_cidr]
}"#;
        assert!(CodeScan::new(code).open_admin_ingress().is_empty());
    }

    #[test]
    fn test_port_match_is_exact() {
        let code = r#"ingress {
  from_port   = 2222
  cidr_blocks = ["0.0.0.0/0"]
}"#;
        assert!(CodeScan::new(code).open_admin_ingress().is_empty());
    }

    #[test]
    fn test_open_port_range_covers_admin_ports() {
        let code = r#"ingress {
  from_port   = 0
  to_port     = 65535
  protocol    = "tcp"
  cidr_blocks = ["0.0.0.0/0"]
}
ingress {
  from_port   = 3000
  to_port     = 3500
  protocol    = "tcp"
  cidr_blocks = ["0.0.0.0/0"]
}
ingress {
  from_port   = 443
  to_port     = 8080
  protocol    = "tcp"
  cidr_blocks = ["0.0.0.0/0"]
}"#;
        let open = CodeScan::new(code).open_admin_ingress();
        assert_eq!(open.len(), 2);
        assert!(open[0].contains("to_port     = 65535"));
        assert!(open[1].contains("to_port     = 3500"));
    }

    #[test]
    fn test_all_protocols_open_admin_ports() {
        let code = r#"ingress {
  from_port   = 0
  to_port     = 0
  protocol    = "-1"
  cidr_blocks = ["0.0.0.0/0"]
}"#;
        assert_eq!(CodeScan::new(code).open_admin_ingress().len(), 1);
    }

    #[test]
    fn test_literal_credentials() {
        let code = r#"
  password        = "hunter2"
  master_password = var.db_password
  api_secret      = "${var.secret}"
  client_secret   = 'abc'
"#;
        let scan = CodeScan::new(code);
        assert_eq!(scan.literal_credentials(), vec!["password", "client_secret"]);
    }

    #[test]
    fn test_unclosed_block_runs_to_end() {
        let scan = CodeScan::new("resource \"aws_vpc\" \"main\" {\n  cidr_block = \"10.0.0.0/16\"\n");
        assert_eq!(scan.resource_count(), 1);
        assert!(scan.resources()[0].body.contains("cidr_block"));
        assert!(!scan.braces_balanced());
    }

    #[test]
    fn test_declarations() {
        let code = "terraform {\n}\nprovider \"aws\" {\n}\nvariable \"region\" {\n}\n";
        let scan = CodeScan::new(code);
        assert!(scan.has_terraform_block());
        assert!(scan.has_provider());
        assert!(scan.has_variables());

        let scan = CodeScan::new("required_providers {}");
        assert!(!scan.has_provider());
    }
}
