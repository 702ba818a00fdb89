use super::*;

#[test]
fn paragraph_and_emphasis() {
    latex("hello *world*\n", "hello \\textit{world}\n");
    latex("a\n\nb\n", "a\n\nb\n");
}

#[test]
fn headings() {
    latex("# T\n\npara\n", "\\section{T}\npara\n");
    latex("## S\n", "\\subsection{S}\n");
}

#[test]
fn lists() {
    latex(
        "- a\n- b\n",
        "\\begin{itemize}\n\\item a\n\\item b\n\\end{itemize}\n",
    );
    latex(
        "1. a\n",
        "\\begin{enumerate}\n\\item a\n\\end{enumerate}\n",
    );
}

#[test]
fn code() {
    latex("`code`\n", "\\texttt{code}\n");
    latex(
        "```c\nx;\n```\n",
        "\\begin{lstlisting}[language=c]\nx;\n\\end{lstlisting}\n",
    );
    latex(
        "```\nx;\n```\n",
        "\\begin{verbatim}\nx;\n\\end{verbatim}\n",
    );
}

#[test]
fn links_and_images() {
    latex("[x](http://e.com)\n", "\\href{http://e.com}{x}\n");
    latex("![a](/b.png)\n", "\\includegraphics{/b.png}\n");
}

#[test]
fn special_characters_are_escaped() {
    latex("50% & more_of_it\n", "50\\% \\& more\\_of\\_it\n");
}
