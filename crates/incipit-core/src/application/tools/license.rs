//! License tool.
//!
//! Writes a LICENSE file for the chosen identifier and advertises the
//! matching trove classifier. The default `LICENSE` value is a plain
//! copyright notice, so projects without a license decision still get
//! a well-formed file.

use tracing::debug;

use std::path::Path;

use crate::application::orchestrator::{Hook, ToolContext};
use crate::application::structure::FileSpec;
use crate::application::tools::Tool;
use crate::domain::StringTemplate;
use crate::error::IncipitResult;

/// Identifiers with embedded texts, for the CLI listing.
pub const KNOWN_LICENSES: &[&str] = &[
    "Copyright",
    "MIT",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "Apache-2.0",
    "GPL-3.0-or-later",
];

const COPYRIGHT_LINE: &str = "Copyright (c) {YEAR} {AUTHOR_NAME} <{AUTHOR_EMAIL}>";

const MIT_BODY: &str = "\
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";

const BSD_DISCLAIMER: &str = "\
THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS \"AS IS\"
AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
POSSIBILITY OF SUCH DAMAGE.";

const BSD_PREAMBLE: &str = "\
Redistribution and use in source and binary forms, with or without
modification, are permitted provided that the following conditions are met:";

const BSD_CLAUSE_1: &str = "\
1. Redistributions of source code must retain the above copyright notice,
   this list of conditions and the following disclaimer.";

const BSD_CLAUSE_2: &str = "\
2. Redistributions in binary form must reproduce the above copyright notice,
   this list of conditions and the following disclaimer in the documentation
   and/or other materials provided with the distribution.";

const BSD_CLAUSE_3: &str = "\
3. Neither the name of the copyright holder nor the names of its contributors
   may be used to endorse or promote products derived from this software
   without specific prior written permission.";

const APACHE_NOTICE: &str = "\
Licensed under the Apache License, Version 2.0 (the \"License\");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an \"AS IS\" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.";

const GPL3_NOTICE: &str = "\
This program is free software: you can redistribute it and/or modify it under
the terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

This program is distributed in the hope that it will be useful, but WITHOUT
ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
this program. If not, see <https://www.gnu.org/licenses/>.";

/// Paragraphs of the license text, joined with blank lines on dump.
fn paragraphs(identifier: &str) -> Vec<&'static str> {
    match identifier {
        "MIT" => vec!["MIT License", COPYRIGHT_LINE, MIT_BODY],
        "BSD-2-Clause" => vec![
            COPYRIGHT_LINE,
            BSD_PREAMBLE,
            BSD_CLAUSE_1,
            BSD_CLAUSE_2,
            BSD_DISCLAIMER,
        ],
        "BSD-3-Clause" => vec![
            COPYRIGHT_LINE,
            BSD_PREAMBLE,
            BSD_CLAUSE_1,
            BSD_CLAUSE_2,
            BSD_CLAUSE_3,
            BSD_DISCLAIMER,
        ],
        "Apache-2.0" => vec![COPYRIGHT_LINE, APACHE_NOTICE],
        "GPL-3.0-or-later" => vec![COPYRIGHT_LINE, GPL3_NOTICE],
        _ => vec![COPYRIGHT_LINE],
    }
}

/// Trove classifier for an identifier, falling back to proprietary.
pub fn classifier(identifier: &str) -> &'static str {
    match identifier {
        "MIT" => "License :: OSI Approved :: MIT License",
        "BSD-2-Clause" | "BSD-3-Clause" => "License :: OSI Approved :: BSD License",
        "Apache-2.0" => "License :: OSI Approved :: Apache Software License",
        "GPL-3.0-or-later" => {
            "License :: OSI Approved :: GNU General Public License v3 or later (GPLv3+)"
        }
        _ => "License :: Other/Proprietary License",
    }
}

#[derive(Debug, Default)]
pub struct License {
    identifier: String,
}

impl Tool for License {
    fn name(&self) -> &'static str {
        "license"
    }

    fn setup(&mut self, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        self.identifier = ctx
            .environment
            .lookup("LICENSE", ctx.prompter)?
            .unwrap_or_else(|| "Copyright".to_owned());
        debug!(identifier = %self.identifier, "selected license");

        let mut file = ctx
            .structure
            .config_list(FileSpec::text_sep("LICENSE", "\n\n"))?;
        for paragraph in paragraphs(&self.identifier) {
            file.push(StringTemplate::from(paragraph).allow_empty());
        }
        Ok(())
    }

    fn pre(&mut self, _workon: &Path, ctx: &mut ToolContext<'_>) -> IncipitResult<()> {
        ctx.emit(Hook::Classifier(classifier(&self.identifier).to_owned()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::orchestrator::BootstrapService;
    use crate::domain::Environment;
    use crate::test_support::{
        MemoryFilesystem, PlainDumper, RecordingRunner, ScriptedPrompter,
    };

    fn bootstrap_with_license(identifier: Option<&str>) -> MemoryFilesystem {
        let fs = MemoryFilesystem::default();
        let service = BootstrapService::new(
            Box::new(ScriptedPrompter::accept_all()),
            Box::new(RecordingRunner::default()),
            Box::new(fs.clone()),
            Box::new(PlainDumper),
        );
        let mut tools: Vec<Box<dyn Tool>> = vec![Box::new(License::default())];
        let mut env = Environment::default();
        env.feed_cli("YEAR", "2026").unwrap();
        env.feed_cli("AUTHOR_NAME", "Ada Lovelace").unwrap();
        env.feed_cli("AUTHOR_EMAIL", "ada@example.org").unwrap();
        if let Some(identifier) = identifier {
            env.feed_cli("LICENSE", identifier).unwrap();
        }
        service
            .bootstrap(std::path::Path::new("/work"), &mut tools, &mut env)
            .unwrap();
        fs
    }

    #[test]
    fn default_license_is_a_copyright_notice() {
        let fs = bootstrap_with_license(None);
        let text = fs.read_file(std::path::Path::new("/work/LICENSE")).unwrap();
        assert!(text.contains("Copyright (c) 2026 Ada Lovelace <ada@example.org>"));
        assert!(!text.contains("MIT License"));
    }

    #[test]
    fn mit_license_has_the_full_grant() {
        let fs = bootstrap_with_license(Some("MIT"));
        let text = fs.read_file(std::path::Path::new("/work/LICENSE")).unwrap();
        assert!(text.starts_with("MIT License"));
        assert!(text.contains("Permission is hereby granted"));
        assert!(text.contains("2026 Ada Lovelace"));
    }

    #[test]
    fn every_known_license_maps_to_a_classifier() {
        for identifier in KNOWN_LICENSES {
            assert!(classifier(identifier).starts_with("License ::"));
        }
    }

    #[test]
    fn bsd3_adds_the_endorsement_clause() {
        assert_eq!(paragraphs("BSD-3-Clause").len(), 6);
        assert_eq!(paragraphs("BSD-2-Clause").len(), 5);
    }
}
