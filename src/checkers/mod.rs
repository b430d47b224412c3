// Copyright 2024 zhlinh and tidylint Project Authors. All rights reserved.
// Use of this source code is governed by a MIT-style
// license that can be found at
//
// https://opensource.org/license/MIT
//
// The above copyright notice and this permission
// notice shall be included in all copies or
// substantial portions of the Software.

//! Linter implementations.

pub mod clang_tidy;
pub mod traits;

pub use clang_tidy::ClangTidyChecker;
pub use traits::Checker;
