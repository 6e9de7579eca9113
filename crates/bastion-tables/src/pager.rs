//! Page navigation controls
//!
//! Every table renders the same pager: a previous button, a window of page numbers with
//! ellipses for skipped ranges, and a next button. Buttons are disabled at the bounds, so
//! the pager never requests a page below 1 or past the last page.

use serde::Serialize;

/// One control of the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PagerItem {
	/// "Previous" button
	Previous {
		/// Whether it can be clicked
		enabled: bool,
	},
	/// Numbered page button
	Page {
		/// Page number
		number: u64,
		/// Whether it is the current page
		active: bool,
	},
	/// Skipped range of pages
	Ellipsis,
	/// "Next" button
	Next {
		/// Whether it can be clicked
		enabled: bool,
	},
}

/// Pager for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
	current_page: u64,
	total_pages: u64,
}

impl Pager {
	/// Pager at `current_page` of `total_pages`
	pub fn new(current_page: u64, total_pages: u64) -> Self {
		Self {
			current_page,
			total_pages,
		}
	}

	/// Current page
	pub fn current_page(&self) -> u64 {
		self.current_page
	}

	/// Number of pages
	pub fn total_pages(&self) -> u64 {
		self.total_pages
	}

	/// Page "previous" navigates to, `None` on the first page
	pub fn previous_target(&self) -> Option<u64> {
		(self.current_page > 1 && self.total_pages > 0)
			.then(|| (self.current_page - 1).min(self.total_pages))
	}

	/// Page "next" navigates to, `None` on the last page
	pub fn next_target(&self) -> Option<u64> {
		(self.current_page < self.total_pages).then(|| self.current_page + 1)
	}

	/// Controls to render, left to right
	///
	/// Shows the first and last page and the pages next to the current one. A gap of a
	/// single page shows that page; longer gaps collapse into an ellipsis. An empty table
	/// gets only the two disabled buttons.
	pub fn items(&self) -> Vec<PagerItem> {
		let mut items = vec![PagerItem::Previous {
			enabled: self.previous_target().is_some(),
		}];
		let mut last_shown = 0;
		for number in self.window() {
			match number - last_shown {
				1 => {}
				2 => items.push(self.page(number - 1)),
				_ => items.push(PagerItem::Ellipsis),
			}
			items.push(self.page(number));
			last_shown = number;
		}
		items.push(PagerItem::Next {
			enabled: self.next_target().is_some(),
		});
		items
	}

	/// Page numbers shown, ascending and without duplicates
	fn window(&self) -> Vec<u64> {
		let mut pages = vec![
			1,
			self.current_page.saturating_sub(1),
			self.current_page,
			self.current_page.saturating_add(1),
			self.total_pages,
		];
		pages.retain(|number| (1..=self.total_pages).contains(number));
		pages.sort_unstable();
		pages.dedup();
		pages
	}

	fn page(&self, number: u64) -> PagerItem {
		PagerItem::Page {
			number,
			active: number == self.current_page,
		}
	}
}
